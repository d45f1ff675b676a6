//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter
//! can remain agnostic of Macroquad's UI types. New control-panel widgets
//! should be added here via `draw_control_panel_ui`.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use tilebound_core::{LayerName, Mode};
use tilebound_rendering::LayerPanelEntry;

/// Outcome of rendering the control panel UI for the current frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Whether the mode toggle button was pressed during this frame.
    pub mode_toggle_pressed: bool,
    /// Whether the save button was pressed during this frame.
    pub save_pressed: bool,
    /// Whether the load button was pressed during this frame.
    pub load_pressed: bool,
    /// Layer whose select button was pressed, if any.
    pub layer_selected: Option<LayerName>,
    /// Layer whose visibility button was pressed, if any.
    pub visibility_toggled: Option<LayerName>,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext<'a> {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub background: Color,
    /// Current session mode, displayed as a status label.
    pub mode: Mode,
    /// Rows of the layer list, in back-to-front order.
    pub layers: &'a [LayerPanelEntry],
}

/// Renders the control panel's interactive elements for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext<'_>,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(0.0, 0.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut result = ControlPanelUiResult::default();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        let mode_label = match context.mode {
            Mode::Edit => "Mode: Edit",
            Mode::Play => "Mode: Play",
        };
        ui.label(None, mode_label);
        result.mode_toggle_pressed = ui.button(None, "Toggle Mode (Tab)");

        if ui.button(None, "Save (F5)") {
            result.save_pressed = true;
        }
        if ui.button(None, "Load (F9)") {
            result.load_pressed = true;
        }

        if context.mode == Mode::Edit {
            ui.separator();
            ui.label(None, "Layers");
            for entry in context.layers {
                let marker = if entry.active { "*" } else { " " };
                let select_label = format!("{marker} {}", entry.name.as_str());
                if ui.button(None, select_label.as_str()) {
                    result.layer_selected = Some(entry.name.clone());
                }
                let visibility_label = if entry.visible {
                    format!("hide {}", entry.name.as_str())
                } else {
                    format!("show {}", entry.name.as_str())
                };
                if ui.button(None, visibility_label.as_str()) {
                    result.visibility_toggled = Some(entry.name.clone());
                }
            }
        }
    });

    ui.pop_skin();

    result
}
