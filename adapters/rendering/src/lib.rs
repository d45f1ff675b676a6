#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tilebound adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};
use tilebound_core::{CellCoord, InputSnapshot, LayerName, Mode, SheetKey, TileRef, Tool};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Palette region selected by a pointer click, in sheet pixel offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PalettePick {
    /// Horizontal pixel offset into the sheet.
    pub source_x: u32,
    /// Vertical pixel offset into the sheet.
    pub source_y: u32,
}

impl PalettePick {
    /// Creates a new palette pick descriptor.
    #[must_use]
    pub const fn new(source_x: u32, source_y: u32) -> Self {
        Self { source_x, source_y }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the adapter detected a mode-toggle press on this frame.
    pub mode_toggle: bool,
    /// Whether the adapter detected a save request on this frame.
    pub save_requested: bool,
    /// Whether the adapter detected a load request on this frame.
    pub load_requested: bool,
    /// Grid cell currently under the cursor, when the cursor is over the map.
    pub cursor_cell: Option<CellCoord>,
    /// Paint tool the pointer applied on this frame, when any.
    pub tool: Option<Tool>,
    /// Palette region the pointer selected on this frame, when any.
    pub palette_pick: Option<PalettePick>,
    /// Layer the player selected as the new paint target, when any.
    pub layer_selected: Option<LayerName>,
    /// Layer whose visibility flag the player toggled, when any.
    pub layer_visibility_toggled: Option<LayerName>,
    /// Movement keys held and jump edge captured for the playtest tick.
    pub held: InputSnapshot,
}

/// Describes the uniform cell grid that frames the map area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    ///
    /// Returns an error when either dimension is zero or the cell length is
    /// not positive.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_length: f32,
        line_color: Color,
    ) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 || cell_length <= 0.0 {
            return Err(RenderingError::DegenerateGrid {
                columns,
                rows,
                cell_length,
            });
        }

        Ok(Self {
            columns,
            rows,
            cell_length,
            line_color,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Converts a world-space position into the cell beneath it.
    ///
    /// Floor division keeps the mapping consistent with how cells are drawn,
    /// so a position on a shared edge belongs to the lower-right neighbour.
    /// Returns `None` outside the grid.
    #[must_use]
    pub fn cell_under(&self, position: Vec2) -> Option<CellCoord> {
        let column = (position.x / self.cell_length).floor() as i32;
        let row = (position.y / self.cell_length).floor() as i32;
        if column < 0 || row < 0 || column as u32 >= self.columns || row as u32 >= self.rows {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }
}

/// One resolved tile blit inside a scene layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneTile {
    /// Destination cell within the grid.
    pub cell: CellCoord,
    /// Sheet region the cell displays.
    pub tile: TileRef,
}

impl SceneTile {
    /// Creates a new scene tile descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, tile: TileRef) -> Self {
        Self { cell, tile }
    }
}

/// One visible layer flattened into its non-empty cells.
///
/// Invisible layers never reach the scene; adapters filter them out while
/// populating, so backends draw every layer they receive, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayer {
    /// Name identifying the layer in the session.
    pub name: LayerName,
    /// Sheet the layer's palette references.
    pub sheet: SheetKey,
    /// Non-empty cells in arbitrary order.
    pub tiles: Vec<SceneTile>,
}

impl SceneLayer {
    /// Creates a new scene layer descriptor.
    #[must_use]
    pub fn new(name: LayerName, sheet: SheetKey, tiles: Vec<SceneTile>) -> Self {
        Self { name, sheet, tiles }
    }
}

/// Playtest actor rendered from the character sheet.
///
/// The position is expressed in fractional cell units so the backend can
/// place the sprite between cells while the actor is in motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePlayer {
    /// Actor position in fractional cell units.
    pub position: Vec2,
    /// Horizontal pixel offset of the displayed pose in the character sheet.
    pub source_x: u32,
    /// Vertical pixel offset of the displayed pose in the character sheet.
    pub source_y: u32,
}

impl ScenePlayer {
    /// Creates a player descriptor showing the idle pose.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            source_x: 0,
            source_y: 0,
        }
    }
}

/// Palette state mirrored into the control panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PalettePresentation {
    /// Sheet the palette currently browses.
    pub sheet: SheetKey,
    /// Brush region currently selected.
    pub selected: PalettePick,
}

impl PalettePresentation {
    /// Creates a new palette descriptor.
    #[must_use]
    pub const fn new(sheet: SheetKey, selected: PalettePick) -> Self {
        Self { sheet, selected }
    }
}

/// One row of the control panel's layer list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayerPanelEntry {
    /// Name shown on the row.
    pub name: LayerName,
    /// Visibility flag mirrored by the row's toggle.
    pub visible: bool,
    /// Whether the row represents the active paint target.
    pub active: bool,
}

impl LayerPanelEntry {
    /// Creates a new layer panel row descriptor.
    #[must_use]
    pub const fn new(name: LayerName, visible: bool, active: bool) -> Self {
        Self {
            name,
            visible,
            active,
        }
    }
}

/// Sound effects queued for best-effort playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// The playtest actor launched a jump.
    Jump,
}

/// Scene description combining the layered map, actor and panel state.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Uniform grid framing the map area.
    pub grid: GridPresentation,
    /// Visible layers in back-to-front order.
    pub layers: Vec<SceneLayer>,
    /// Playtest actor, present only while playtesting.
    pub player: Option<ScenePlayer>,
    /// Session mode the frame should be drawn for.
    pub mode: Mode,
    /// Palette state mirrored into the control panel.
    pub palette: PalettePresentation,
    /// Rows of the control panel's layer list.
    pub layer_panel: Vec<LayerPanelEntry>,
    /// Sound effects queued since the previous frame; backends drain this.
    pub audio_cues: Vec<AudioCue>,
}

impl Scene {
    /// Creates a new scene descriptor with no queued audio.
    #[must_use]
    pub fn new(
        grid: GridPresentation,
        layers: Vec<SceneLayer>,
        player: Option<ScenePlayer>,
        mode: Mode,
        palette: PalettePresentation,
        layer_panel: Vec<LayerPanelEntry>,
    ) -> Self {
        Self {
            grid,
            layers,
            player,
            mode,
            palette,
            layer_panel,
            audio_cues: Vec::new(),
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tilebound scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Grid dimensions and cell length must all be positive.
    DegenerateGrid {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
        /// Provided cell side length.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateGrid {
                columns,
                rows,
                cell_length,
            } => {
                write!(
                    f,
                    "grid dimensions must be positive (received {columns}x{rows} cells of length {cell_length})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
