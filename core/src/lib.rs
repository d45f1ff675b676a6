#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilebound editor.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative editor session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of cell columns in every layer grid.
pub const GRID_COLUMNS: u32 = 20;

/// Number of cell rows in every layer grid.
pub const GRID_ROWS: u32 = 12;

/// Edge length of a single square cell expressed in world units.
pub const CELL_LENGTH: f32 = 64.0;

/// Describes the active session mode for the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Editing mode where painting tools mutate the level.
    Edit,
    /// Playtest mode where the actor is simulated and editing is disabled.
    Play,
}

/// Identifies one of the four external sprite-sheet resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SheetKey {
    /// Backdrop scenery sheet.
    Background,
    /// Solid terrain sheet sampled for playtest collision.
    Foreground,
    /// Enemy decoration sheet.
    Enemies,
    /// Character sheet used for the playtest actor sprite.
    Character,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Name that identifies a layer within the level's ordered stack.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerName(String);

impl LayerName {
    /// Creates a new layer name from the provided string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Retrieves the textual representation of the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pointer into a sprite sheet identifying what a cell displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    source_x: u32,
    source_y: u32,
    sheet: SheetKey,
}

impl TileRef {
    /// Creates a new tile reference from pixel offsets into the given sheet.
    #[must_use]
    pub const fn new(source_x: u32, source_y: u32, sheet: SheetKey) -> Self {
        Self {
            source_x,
            source_y,
            sheet,
        }
    }

    /// Horizontal pixel offset of the tile within its sheet.
    #[must_use]
    pub const fn source_x(&self) -> u32 {
        self.source_x
    }

    /// Vertical pixel offset of the tile within its sheet.
    #[must_use]
    pub const fn source_y(&self) -> u32 {
        self.source_y
    }

    /// Sheet the tile reference points into.
    #[must_use]
    pub const fn sheet(&self) -> SheetKey {
        self.sheet
    }
}

/// Painting tools available in edit mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Sets the target cell to the selected palette tile.
    Draw,
    /// Sets the target cell to empty regardless of content.
    Erase,
}

/// Keys held or pressed during a single playtest tick.
///
/// Adapters capture this snapshot once per frame and pass it into the tick
/// command so the physics step never reads ambient input state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputSnapshot {
    /// Whether the left-move input is currently held.
    pub move_left: bool,
    /// Whether the right-move input is currently held.
    pub move_right: bool,
    /// Whether a jump input edge was detected since the previous tick.
    pub jump_pressed: bool,
}

/// Kinematic state of the playtest actor.
///
/// Position is expressed in fractional cell units; velocity in cell units per
/// simulated second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorState {
    /// Horizontal position in fractional cell units.
    pub x: f32,
    /// Vertical position in fractional cell units.
    pub y: f32,
    /// Horizontal velocity in cell units per simulated second.
    pub velocity_x: f32,
    /// Vertical velocity in cell units per simulated second.
    pub velocity_y: f32,
    /// Whether the actor currently rests on a solid cell.
    pub grounded: bool,
}

impl ActorState {
    /// Creates an actor at rest on the provided cell, airborne until the
    /// first collision check grounds it.
    #[must_use]
    pub fn at_cell(cell: CellCoord) -> Self {
        Self {
            x: cell.column() as f32,
            y: cell.row() as f32,
            velocity_x: 0.0,
            velocity_y: 0.0,
            grounded: false,
        }
    }
}

/// Serializable twin of a layer used for persistence and level replacement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    /// Name identifying the layer within the stack.
    pub name: LayerName,
    /// Whether the layer participates in rendering.
    pub visible: bool,
    /// Sheet newly painted tiles in this layer reference.
    pub sheet: SheetKey,
    /// Row-major cell contents, exactly `GRID_COLUMNS * GRID_ROWS` entries.
    pub cells: Vec<Option<TileRef>>,
}

/// Serializable twin of the whole level: an ordered stack of layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Layers in back-to-front rendering order.
    pub layers: Vec<LayerSnapshot>,
}

/// Reasons a level snapshot may be rejected by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelValidationError {
    /// The session is not in edit mode, so level replacement is disabled.
    InvalidMode,
    /// The snapshot contains no layers at all.
    NoLayers,
    /// Two layers in the snapshot share the same name.
    DuplicateLayerName,
    /// A layer name is empty.
    EmptyLayerName,
    /// A layer's cell array does not match the fixed grid dimensions.
    DimensionMismatch,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Selects which layer receives subsequent paint operations.
    SetActiveLayer {
        /// Name of the layer to activate.
        layer: LayerName,
    },
    /// Requests that a single cell be set to the provided tile reference.
    PaintCell {
        /// Layer whose cell grid should be mutated.
        layer: LayerName,
        /// Target cell within the grid.
        cell: CellCoord,
        /// Tile reference to store in the cell.
        tile: TileRef,
    },
    /// Requests that a single cell be set to empty.
    ClearCell {
        /// Layer whose cell grid should be mutated.
        layer: LayerName,
        /// Target cell within the grid.
        cell: CellCoord,
    },
    /// Flips the visibility flag of the named layer.
    ToggleLayerVisibility {
        /// Layer whose visibility should change.
        layer: LayerName,
    },
    /// Requests that the session transition to the provided mode.
    SetMode {
        /// Mode the session should activate.
        mode: Mode,
    },
    /// Advances the playtest simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Keys held or pressed during the elapsed interval.
        input: InputSnapshot,
    },
    /// Replaces the entire level with the provided snapshot.
    ReplaceLevel {
        /// Snapshot the level should be rebuilt from.
        level: LevelSnapshot,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a different layer became the paint target.
    ActiveLayerChanged {
        /// Layer that is now active.
        layer: LayerName,
    },
    /// Confirms that exactly one cell of exactly one layer changed.
    CellChanged {
        /// Layer that was mutated.
        layer: LayerName,
        /// Cell that was replaced.
        cell: CellCoord,
        /// New content of the cell.
        tile: Option<TileRef>,
    },
    /// Confirms that a layer's visibility flag flipped.
    LayerVisibilityChanged {
        /// Layer whose flag changed.
        layer: LayerName,
        /// Visibility after the change.
        visible: bool,
    },
    /// Announces that the session entered a new mode.
    ModeChanged {
        /// Mode that became active after processing commands.
        mode: Mode,
    },
    /// Confirms that a playtest actor was created at its spawn cell.
    ActorSpawned {
        /// Cell the actor occupies after spawning.
        cell: CellCoord,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that the actor launched a jump this tick.
    JumpStarted,
    /// Reports that the actor came to rest on a solid cell.
    ActorLanded {
        /// Row of the cell the actor now stands on.
        row: u32,
    },
    /// Confirms that the level was replaced wholesale.
    LevelReplaced,
    /// Reports that a level replacement request was rejected.
    LevelRejected {
        /// Specific reason the snapshot failed validation.
        reason: LevelValidationError,
    },
}

/// Pure coordinate math shared by the session, systems and adapters.
///
/// All functions use floor semantics so pointer transforms stay consistent
/// with rendering even under fractional surface scaling.
pub mod grid {
    use super::{CellCoord, CELL_LENGTH, GRID_COLUMNS, GRID_ROWS};

    /// Converts a world-space position into signed cell indices.
    ///
    /// Floor division, so slightly negative positions map to `-1` rather
    /// than truncating toward zero.
    #[must_use]
    pub fn cell_at(x: f32, y: f32) -> (i32, i32) {
        (
            (x / CELL_LENGTH).floor() as i32,
            (y / CELL_LENGTH).floor() as i32,
        )
    }

    /// Reports whether the signed cell indices fall inside the fixed grid.
    #[must_use]
    pub fn in_bounds(column: i32, row: i32) -> bool {
        column >= 0 && row >= 0 && (column as u32) < GRID_COLUMNS && (row as u32) < GRID_ROWS
    }

    /// Converts signed cell indices into a coordinate when in bounds.
    #[must_use]
    pub fn cell_in_bounds(column: i32, row: i32) -> Option<CellCoord> {
        if in_bounds(column, row) {
            Some(CellCoord::new(column as u32, row as u32))
        } else {
            None
        }
    }

    /// Clamps fractional actor coordinates into the playable extent.
    #[must_use]
    pub fn clamp_position(x: f32, y: f32) -> (f32, f32) {
        (
            x.clamp(0.0, (GRID_COLUMNS - 1) as f32),
            y.clamp(0.0, (GRID_ROWS - 1) as f32),
        )
    }
}
