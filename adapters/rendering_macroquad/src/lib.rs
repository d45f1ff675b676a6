#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Tilebound.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature and expose an opt-in `audio` cargo feature of our
//! own; without it, queued audio cues are drained and dropped.
//!
//! The adapter uses Macroquad's immediate-mode UI module so the control panel
//! can host widgets. All UI-specific calls live inside the local `ui` module
//! to avoid leaking Macroquad UI types throughout the renderer.

mod sprites;
mod ui;

use self::sprites::{BlitParams, SheetAtlas, SHEET_TILE_LENGTH};
use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, mouse_position,
    KeyCode, MouseButton,
};
use macroquad::math::Vec2 as MacroquadVec2;
use tilebound_core::{LayerName, Mode, SheetKey, Tool};
use tilebound_rendering::{
    AudioCue, Color, FrameInput, PalettePick, Presentation, RenderingBackend, Scene, ScenePlayer,
};
use std::{
    sync::mpsc,
    time::Duration,
};

/// Width of the control panel docked at the right edge, in screen pixels.
const PANEL_WIDTH: f32 = 280.0;

/// Displayed side length of one palette tile, in screen pixels.
const PALETTE_TILE_DISPLAY: f32 = 32.0;

/// Vertical offset of the palette picker inside the panel.
const PALETTE_TOP: f32 = 330.0;

const PANEL_BACKGROUND: Color = Color::new(0.125, 0.125, 0.14, 1.0);

/// Tracks UI-sourced interactions so they can be merged with physical input
/// on the next frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct ControlPanelInputState {
    mode_toggle_latched: bool,
    save_latched: bool,
    load_latched: bool,
    layer_selected_latched: Option<LayerName>,
    visibility_toggled_latched: Option<LayerName>,
    palette_pick_latched: Option<PalettePick>,
}

impl ControlPanelInputState {
    /// Returns whether the UI requested a mode toggle and clears the latch so
    /// the action fires only once.
    pub fn take_mode_toggle(&mut self) -> bool {
        let latched = self.mode_toggle_latched;
        self.mode_toggle_latched = false;
        latched
    }

    /// Records that the control-panel button requested a mode toggle this frame.
    pub fn register_mode_toggle(&mut self) {
        self.mode_toggle_latched = true;
    }

    /// Returns whether the UI requested a save, clearing the latch.
    pub fn take_save(&mut self) -> bool {
        let latched = self.save_latched;
        self.save_latched = false;
        latched
    }

    /// Records that the control-panel button requested a save this frame.
    pub fn register_save(&mut self) {
        self.save_latched = true;
    }

    /// Returns whether the UI requested a load, clearing the latch.
    pub fn take_load(&mut self) -> bool {
        let latched = self.load_latched;
        self.load_latched = false;
        latched
    }

    /// Records that the control-panel button requested a load this frame.
    pub fn register_load(&mut self) {
        self.load_latched = true;
    }

    /// Returns the latched layer selection, clearing it so the action fires once.
    pub fn take_layer_selected(&mut self) -> Option<LayerName> {
        self.layer_selected_latched.take()
    }

    /// Records that a layer row requested selection this frame.
    pub fn register_layer_selected(&mut self, layer: LayerName) {
        self.layer_selected_latched = Some(layer);
    }

    /// Returns the latched visibility toggle, clearing it so the action fires once.
    pub fn take_visibility_toggled(&mut self) -> Option<LayerName> {
        self.visibility_toggled_latched.take()
    }

    /// Records that a layer row requested a visibility flip this frame.
    pub fn register_visibility_toggled(&mut self, layer: LayerName) {
        self.visibility_toggled_latched = Some(layer);
    }

    /// Returns the latched palette pick, clearing it so the action fires once.
    pub fn take_palette_pick(&mut self) -> Option<PalettePick> {
        self.palette_pick_latched.take()
    }

    /// Records that the palette picker selected a brush region this frame.
    pub fn register_palette_pick(&mut self, pick: PalettePick) {
        self.palette_pick_latched = Some(pick);
    }
}

/// Snapshot of keyboard state observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the editor loop.
    quit_requested: bool,
    /// `Tab` toggles between edit and playtest mode.
    mode_toggle: bool,
    /// `F5` saves the level to the save slot.
    save: bool,
    /// `F9` loads the level from the save slot.
    load: bool,
    /// `Space` jump edge for the playtest actor.
    jump_pressed: bool,
    /// Left arrow or `A` held.
    move_left_held: bool,
    /// Right arrow or `D` held.
    move_right_held: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            mode_toggle: is_key_pressed(KeyCode::Tab),
            save: is_key_pressed(KeyCode::F5),
            load: is_key_pressed(KeyCode::F9),
            jump_pressed: is_key_pressed(KeyCode::Space),
            move_left_held: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            move_right_held: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the
    /// display refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints a frames-per-second line once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sheet assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Clone, Copy, Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second average once one
    /// second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = if seconds <= f32::EPSILON {
            0.0
        } else {
            self.frames as f32 / seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1560,
            window_height: 768,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut init_sender = Some(atlas_init_sender);
            let mut scene = scene;

            let sheet_atlas = if load_sprites {
                match SheetAtlas::from_default_manifest()
                    .context("failed to initialise sheet atlas")
                {
                    Ok(atlas) => Some(atlas),
                    Err(error) => {
                        if let Some(sender) = init_sender.take() {
                            let _ = sender.send(Err(error));
                        }
                        return;
                    }
                }
            } else {
                None
            };

            if let Some(sender) = init_sender.take() {
                let _ = sender.send(Ok(()));
            }

            #[cfg(feature = "audio")]
            let jump_sound = load_jump_sound().await;

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let frame_input =
                    gather_frame_input(&scene, &metrics_before, keyboard, &mut panel_input);

                update_scene(frame_dt, frame_input, &mut scene);

                for cue in scene.audio_cues.drain(..) {
                    match cue {
                        AudioCue::Jump => {
                            #[cfg(feature = "audio")]
                            if let Some(sound) = jump_sound {
                                macroquad::audio::play_sound_once(sound);
                            }
                        }
                    }
                }

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                if scene.mode == Mode::Edit {
                    draw_grid_overlay(&scene, &metrics);
                }
                draw_layers(&scene, &metrics, sheet_atlas.as_ref());
                if let Some(player) = scene.player {
                    draw_player(player, &metrics, sheet_atlas.as_ref());
                }

                macroquad::shapes::draw_rectangle(
                    metrics.panel_left,
                    0.0,
                    PANEL_WIDTH.min(screen_width),
                    screen_height,
                    to_macroquad_color(PANEL_BACKGROUND),
                );
                {
                    let mut control_panel_ui = macroquad::ui::root_ui();
                    let ControlPanelUiResult {
                        mode_toggle_pressed,
                        save_pressed,
                        load_pressed,
                        layer_selected,
                        visibility_toggled,
                    } = draw_control_panel_ui(
                        &mut control_panel_ui,
                        ControlPanelUiContext {
                            origin: MacroquadVec2::new(metrics.panel_left, 0.0),
                            size: MacroquadVec2::new(PANEL_WIDTH, screen_height),
                            background: to_macroquad_color(PANEL_BACKGROUND),
                            mode: scene.mode,
                            layers: &scene.layer_panel,
                        },
                    );
                    if mode_toggle_pressed {
                        panel_input.register_mode_toggle();
                    }
                    if save_pressed {
                        panel_input.register_save();
                    }
                    if load_pressed {
                        panel_input.register_load();
                    }
                    if let Some(layer) = layer_selected {
                        panel_input.register_layer_selected(layer);
                    }
                    if let Some(layer) = visibility_toggled {
                        panel_input.register_visibility_toggled(layer);
                    }
                }

                if scene.mode == Mode::Edit {
                    if let Some(pick) =
                        draw_palette(&scene, sheet_atlas.as_ref(), metrics.panel_left, screen_height)
                    {
                        panel_input.register_palette_pick(pick);
                    }
                }

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

#[cfg(feature = "audio")]
async fn load_jump_sound() -> Option<macroquad::audio::Sound> {
    match macroquad::audio::load_sound("assets/jump.ogg").await {
        Ok(sound) => Some(sound),
        Err(error) => {
            eprintln!("warning: jump sound unavailable: {error}");
            None
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    cell_step: f32,
    grid_width_scaled: f32,
    grid_height_scaled: f32,
    panel_left: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let grid = scene.grid;
        let world_width = grid.width();
        let world_height = grid.height();
        let panel_width = PANEL_WIDTH.min(screen_width);
        let available_width = (screen_width - panel_width).max(0.0);
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            let width_ratio = if available_width <= f32::EPSILON {
                f32::INFINITY
            } else {
                available_width / world_width
            };
            width_ratio.min(screen_height / world_height)
        };

        let grid_width_scaled = world_width * scale;
        let grid_height_scaled = world_height * scale;
        let offset_x = ((available_width - grid_width_scaled) * 0.5).max(0.0);
        let offset_y = ((screen_height - grid_height_scaled) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            cell_step: grid.cell_length * scale,
            grid_width_scaled,
            grid_height_scaled,
            panel_left: (screen_width - panel_width).max(0.0),
        }
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &SceneMetrics,
    keyboard: KeyboardShortcuts,
    panel_input: &mut ControlPanelInputState,
) -> FrameInput {
    let latched = FrameInput {
        mode_toggle: panel_input.take_mode_toggle(),
        save_requested: panel_input.take_save(),
        load_requested: panel_input.take_load(),
        layer_selected: panel_input.take_layer_selected(),
        layer_visibility_toggled: panel_input.take_visibility_toggled(),
        palette_pick: panel_input.take_palette_pick(),
        ..FrameInput::default()
    };

    let (cursor_x, cursor_y) = mouse_position();
    gather_frame_input_from_observations(
        scene,
        metrics,
        Vec2::new(cursor_x, cursor_y),
        is_mouse_button_down(MouseButton::Left),
        is_mouse_button_down(MouseButton::Right),
        keyboard,
        latched,
    )
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    draw_held: bool,
    erase_held: bool,
    keyboard: KeyboardShortcuts,
    mut input: FrameInput,
) -> FrameInput {
    input.mode_toggle |= keyboard.mode_toggle;
    input.save_requested |= keyboard.save;
    input.load_requested |= keyboard.load;
    input.held.move_left = keyboard.move_left_held;
    input.held.move_right = keyboard.move_right_held;
    input.held.jump_pressed = keyboard.jump_pressed;

    if metrics.scale <= f32::EPSILON {
        return input;
    }

    let world_position = Vec2::new(
        (cursor_position.x - metrics.offset_x) / metrics.scale,
        (cursor_position.y - metrics.offset_y) / metrics.scale,
    );
    input.cursor_cell = scene.grid.cell_under(world_position);

    if input.cursor_cell.is_some() {
        input.tool = if draw_held {
            Some(Tool::Draw)
        } else if erase_held {
            Some(Tool::Erase)
        } else {
            None
        };
    }

    input
}

fn draw_layers(scene: &Scene, metrics: &SceneMetrics, sheet_atlas: Option<&SheetAtlas>) {
    if metrics.cell_step <= f32::EPSILON {
        return;
    }

    for layer in &scene.layers {
        for scene_tile in &layer.tiles {
            let position = Vec2::new(
                metrics.offset_x + scene_tile.cell.column() as f32 * metrics.cell_step,
                metrics.offset_y + scene_tile.cell.row() as f32 * metrics.cell_step,
            );
            match sheet_atlas {
                Some(atlas) => {
                    // Roles whose texture failed to load skip inside blit.
                    atlas.blit(
                        scene_tile.tile.sheet(),
                        BlitParams::new(position, Vec2::splat(metrics.cell_step))
                            .with_source(scene_tile.tile.source_x(), scene_tile.tile.source_y()),
                    );
                }
                None => {
                    macroquad::shapes::draw_rectangle(
                        position.x,
                        position.y,
                        metrics.cell_step,
                        metrics.cell_step,
                        to_macroquad_color(placeholder_color(scene_tile.tile.sheet())),
                    );
                }
            }
        }
    }
}

fn draw_grid_overlay(scene: &Scene, metrics: &SceneMetrics) {
    let grid = scene.grid;
    let grid_color = to_macroquad_color(grid.line_color);

    for column in 0..=grid.columns {
        let x = metrics.offset_x + column as f32 * metrics.cell_step;
        macroquad::shapes::draw_line(
            x,
            metrics.offset_y,
            x,
            metrics.offset_y + metrics.grid_height_scaled,
            1.0,
            grid_color,
        );
    }

    for row in 0..=grid.rows {
        let y = metrics.offset_y + row as f32 * metrics.cell_step;
        macroquad::shapes::draw_line(
            metrics.offset_x,
            y,
            metrics.offset_x + metrics.grid_width_scaled,
            y,
            1.0,
            grid_color,
        );
    }
}

fn draw_player(player: ScenePlayer, metrics: &SceneMetrics, sheet_atlas: Option<&SheetAtlas>) {
    if metrics.cell_step <= f32::EPSILON {
        return;
    }

    let position = Vec2::new(
        metrics.offset_x + player.position.x * metrics.cell_step,
        metrics.offset_y + player.position.y * metrics.cell_step,
    );
    match sheet_atlas {
        Some(atlas) if atlas.contains(SheetKey::Character) => {
            atlas.blit(
                SheetKey::Character,
                BlitParams::new(position, Vec2::splat(metrics.cell_step))
                    .with_source(player.source_x, player.source_y),
            );
        }
        // The actor stays visible even when its sheet failed to load.
        _ => {
            macroquad::shapes::draw_rectangle(
                position.x,
                position.y,
                metrics.cell_step,
                metrics.cell_step,
                to_macroquad_color(placeholder_color(SheetKey::Character)),
            );
        }
    }
}

/// Flat fill used for cells when sheet loading is disabled entirely.
fn placeholder_color(sheet: SheetKey) -> Color {
    match sheet {
        SheetKey::Background => Color::from_rgb_u8(84, 106, 144),
        SheetKey::Foreground => Color::from_rgb_u8(128, 96, 56),
        SheetKey::Enemies => Color::from_rgb_u8(176, 52, 68),
        SheetKey::Character => Color::from_rgb_u8(224, 192, 64),
    }
}

fn draw_palette(
    scene: &Scene,
    sheet_atlas: Option<&SheetAtlas>,
    panel_left: f32,
    screen_height: f32,
) -> Option<PalettePick> {
    let atlas = sheet_atlas?;
    let texture = atlas.texture(scene.palette.sheet)?;
    if texture.width() <= f32::EPSILON || texture.height() <= f32::EPSILON {
        return None;
    }

    let scale = PALETTE_TILE_DISPLAY / SHEET_TILE_LENGTH;
    let left = panel_left + 16.0;
    let top = PALETTE_TOP;
    let dest_width = texture.width() * scale;
    let dest_height = (texture.height() * scale).min((screen_height - top - 16.0).max(0.0));
    if dest_width <= f32::EPSILON || dest_height <= f32::EPSILON {
        return None;
    }

    macroquad::texture::draw_texture_ex(
        texture,
        left,
        top,
        macroquad::color::WHITE,
        macroquad::texture::DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(dest_width, dest_height)),
            ..macroquad::texture::DrawTextureParams::default()
        },
    );

    let selected = scene.palette.selected;
    macroquad::shapes::draw_rectangle_lines(
        left + selected.source_x as f32 * scale,
        top + selected.source_y as f32 * scale,
        PALETTE_TILE_DISPLAY,
        PALETTE_TILE_DISPLAY,
        2.0,
        macroquad::color::YELLOW,
    );

    if is_mouse_button_pressed(MouseButton::Left) {
        let (mouse_x, mouse_y) = mouse_position();
        let local_x = mouse_x - left;
        let local_y = mouse_y - top;
        if local_x >= 0.0 && local_y >= 0.0 && local_x < dest_width && local_y < dest_height {
            let tile_length = SHEET_TILE_LENGTH as u32;
            let source_x = (local_x / PALETTE_TILE_DISPLAY).floor() as u32 * tile_length;
            let source_y = (local_y / PALETTE_TILE_DISPLAY).floor() as u32 * tile_length;
            return Some(PalettePick::new(source_x, source_y));
        }
    }

    None
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilebound_core::{CellCoord, InputSnapshot, CELL_LENGTH, GRID_COLUMNS, GRID_ROWS};
    use tilebound_rendering::{GridPresentation, PalettePresentation, SceneLayer, SceneTile};

    fn test_scene() -> Scene {
        let grid = GridPresentation::new(
            GRID_COLUMNS,
            GRID_ROWS,
            CELL_LENGTH,
            Color::from_rgb_u8(64, 64, 64),
        )
        .expect("standard grid is valid");
        Scene::new(
            grid,
            vec![SceneLayer::new(
                LayerName::new("foreground"),
                SheetKey::Foreground,
                vec![SceneTile::new(
                    CellCoord::new(0, 0),
                    tilebound_core::TileRef::new(0, 0, SheetKey::Foreground),
                )],
            )],
            None,
            Mode::Edit,
            PalettePresentation::new(SheetKey::Foreground, PalettePick::new(0, 0)),
            Vec::new(),
        )
    }

    #[test]
    fn metrics_reserve_the_panel_and_scale_to_fit() {
        let scene = test_scene();
        let metrics = SceneMetrics::from_scene(&scene, PANEL_WIDTH + 640.0, 384.0);

        assert!((metrics.scale - 0.5).abs() < 1e-6, "640/1280 width ratio");
        assert!((metrics.cell_step - CELL_LENGTH * 0.5).abs() < 1e-6);
        assert_eq!(metrics.offset_x, 0.0);
        assert_eq!(metrics.offset_y, 0.0);
        assert_eq!(metrics.panel_left, 640.0);
    }

    #[test]
    fn metrics_letterbox_the_unused_axis() {
        let scene = test_scene();
        let metrics = SceneMetrics::from_scene(&scene, PANEL_WIDTH + 1280.0, 1000.0);

        assert!((metrics.scale - 1.0).abs() < 1e-6, "height is the binding axis");
        assert_eq!(metrics.offset_x, 0.0);
        assert!((metrics.offset_y - 116.0).abs() < 1e-3, "vertical letterbox");
    }

    #[test]
    fn cursor_over_the_map_resolves_to_a_cell_and_tool() {
        let scene = test_scene();
        let metrics = SceneMetrics::from_scene(&scene, PANEL_WIDTH + 1280.0, 768.0);

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::new(CELL_LENGTH * 1.5, CELL_LENGTH * 2.5),
            true,
            false,
            KeyboardShortcuts::default(),
            FrameInput::default(),
        );

        assert_eq!(input.cursor_cell, Some(CellCoord::new(1, 2)));
        assert_eq!(input.tool, Some(Tool::Draw));
    }

    #[test]
    fn cursor_over_the_panel_resolves_to_nothing() {
        let scene = test_scene();
        let metrics = SceneMetrics::from_scene(&scene, PANEL_WIDTH + 1280.0, 768.0);

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::new(1280.0 + 20.0, 100.0),
            true,
            false,
            KeyboardShortcuts::default(),
            FrameInput::default(),
        );

        assert_eq!(input.cursor_cell, None);
        assert_eq!(input.tool, None, "panel clicks never paint");
    }

    #[test]
    fn keyboard_state_flows_into_the_held_snapshot() {
        let scene = test_scene();
        let metrics = SceneMetrics::from_scene(&scene, PANEL_WIDTH + 1280.0, 768.0);
        let keyboard = KeyboardShortcuts {
            move_right_held: true,
            jump_pressed: true,
            mode_toggle: true,
            ..KeyboardShortcuts::default()
        };

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::new(-100.0, -100.0),
            false,
            false,
            keyboard,
            FrameInput::default(),
        );

        assert!(input.mode_toggle);
        assert_eq!(
            input.held,
            InputSnapshot {
                move_left: false,
                move_right: true,
                jump_pressed: true,
            }
        );
    }

    #[test]
    fn latched_panel_actions_survive_the_merge_with_keyboard_input() {
        let scene = test_scene();
        let metrics = SceneMetrics::from_scene(&scene, PANEL_WIDTH + 1280.0, 768.0);
        let latched = FrameInput {
            save_requested: true,
            layer_selected: Some(LayerName::new("enemies")),
            palette_pick: Some(PalettePick::new(128, 64)),
            ..FrameInput::default()
        };

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::new(-100.0, -100.0),
            false,
            false,
            KeyboardShortcuts::default(),
            latched,
        );

        assert!(input.save_requested);
        assert_eq!(input.layer_selected, Some(LayerName::new("enemies")));
        assert_eq!(input.palette_pick, Some(PalettePick::new(128, 64)));
    }
}
