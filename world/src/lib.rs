#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative editor-session state.
//!
//! The [`World`] owns the layered level, the active paint target, the session
//! mode, and the playtest actor. All mutation flows through [`apply`], which
//! executes one [`Command`] and appends the resulting [`Event`] values to the
//! caller's buffer. Read access goes through the [`query`] module so systems
//! and adapters observe state without being able to mutate it.

use std::collections::BTreeSet;
use std::time::Duration;

use tilebound_core::{
    ActorState, CellCoord, Command, Event, InputSnapshot, LayerName, LayerSnapshot, LevelSnapshot,
    LevelValidationError, Mode, SheetKey, TileRef, GRID_COLUMNS, GRID_ROWS,
};
use tilebound_system_playtest as playtest;

/// One named grid of cells inside the level's ordered stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    name: LayerName,
    visible: bool,
    sheet: SheetKey,
    cells: Vec<Option<TileRef>>,
}

impl Layer {
    fn empty(name: LayerName, sheet: SheetKey) -> Self {
        Self {
            name,
            visible: true,
            sheet,
            cells: vec![None; (GRID_COLUMNS * GRID_ROWS) as usize],
        }
    }

    fn from_snapshot(snapshot: LayerSnapshot) -> Self {
        Self {
            name: snapshot.name,
            visible: snapshot.visible,
            sheet: snapshot.sheet,
            cells: snapshot.cells,
        }
    }

    /// Flat row-major index of the cell, or `None` when out of bounds.
    fn index(cell: CellCoord) -> Option<usize> {
        if cell.column() < GRID_COLUMNS && cell.row() < GRID_ROWS {
            Some((cell.row() * GRID_COLUMNS + cell.column()) as usize)
        } else {
            None
        }
    }

    /// Name identifying the layer within the stack.
    #[must_use]
    pub fn name(&self) -> &LayerName {
        &self.name
    }

    /// Whether the layer participates in rendering.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Sheet newly painted tiles in this layer reference.
    #[must_use]
    pub fn sheet(&self) -> SheetKey {
        self.sheet
    }

    /// Content of the cell, or `None` when empty or out of bounds.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Option<TileRef> {
        Self::index(cell).and_then(|index| self.cells[index])
    }

    fn to_snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            name: self.name.clone(),
            visible: self.visible,
            sheet: self.sheet,
            cells: self.cells.clone(),
        }
    }
}

/// Authoritative session state mutated exclusively through [`apply`].
#[derive(Debug)]
pub struct World {
    layers: Vec<Layer>,
    active_layer: LayerName,
    mode: Mode,
    actor: Option<ActorState>,
    accumulator: Duration,
}

impl World {
    /// Creates a session holding the default empty level.
    ///
    /// The default stack is `background`, `foreground`, `enemies` in
    /// back-to-front order, all visible and empty, with the first layer
    /// active and the session in edit mode.
    #[must_use]
    pub fn new() -> Self {
        let layers = vec![
            Layer::empty(LayerName::new("background"), SheetKey::Background),
            Layer::empty(LayerName::new("foreground"), SheetKey::Foreground),
            Layer::empty(LayerName::new("enemies"), SheetKey::Enemies),
        ];
        let active_layer = layers[0].name().clone();
        Self {
            layers,
            active_layer,
            mode: Mode::Edit,
            actor: None,
            accumulator: Duration::ZERO,
        }
    }

    fn layer_mut(&mut self, name: &LayerName) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.name() == name)
    }

    fn has_layer(&self, name: &LayerName) -> bool {
        self.layers.iter().any(|layer| layer.name() == name)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_snapshot(level: &LevelSnapshot) -> Result<(), LevelValidationError> {
    if level.layers.is_empty() {
        return Err(LevelValidationError::NoLayers);
    }
    let mut seen = BTreeSet::new();
    for layer in &level.layers {
        if layer.name.as_str().is_empty() {
            return Err(LevelValidationError::EmptyLayerName);
        }
        if !seen.insert(layer.name.clone()) {
            return Err(LevelValidationError::DuplicateLayerName);
        }
        if layer.cells.len() != (GRID_COLUMNS * GRID_ROWS) as usize {
            return Err(LevelValidationError::DimensionMismatch);
        }
    }
    Ok(())
}

fn is_cell_solid(layers: &[Layer], cell: CellCoord) -> bool {
    layers
        .iter()
        .filter(|layer| layer.sheet() == SheetKey::Foreground)
        .any(|layer| layer.tile_at(cell).is_some())
}

fn write_cell(
    world: &mut World,
    layer_name: &LayerName,
    cell: CellCoord,
    tile: Option<TileRef>,
    out_events: &mut Vec<Event>,
) {
    if world.mode != Mode::Edit {
        return;
    }
    let Some(layer) = world.layer_mut(layer_name) else {
        return;
    };
    let Some(index) = Layer::index(cell) else {
        return;
    };
    layer.cells[index] = tile;
    out_events.push(Event::CellChanged {
        layer: layer_name.clone(),
        cell,
        tile,
    });
}

fn run_tick(world: &mut World, dt: Duration, input: InputSnapshot, out_events: &mut Vec<Event>) {
    if world.mode != Mode::Play {
        return;
    }
    let Some(mut actor) = world.actor else {
        return;
    };

    world.accumulator += dt;
    let mut input = input;
    while world.accumulator >= playtest::TICK_DURATION {
        world.accumulator -= playtest::TICK_DURATION;
        let outcome = playtest::step(&mut actor, input, |cell| {
            is_cell_solid(&world.layers, cell)
        });
        if outcome.jumped {
            out_events.push(Event::JumpStarted);
        }
        if outcome.landed {
            out_events.push(Event::ActorLanded {
                row: actor.y as u32,
            });
        }
        // The jump edge covers the elapsed interval once, not once per
        // quantum of it.
        input.jump_pressed = false;
    }

    world.actor = Some(actor);
    out_events.push(Event::TimeAdvanced { dt });
}

/// Executes one command against the session, appending resulting events.
///
/// Invalid requests (unknown layers, out-of-bounds cells, paint commands
/// while playtesting) are silent structural no-ops. Level replacement is the
/// exception: its failures are reported through [`Event::LevelRejected`] so
/// adapters can surface them.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetActiveLayer { layer } => {
            if layer != world.active_layer && world.has_layer(&layer) {
                world.active_layer = layer.clone();
                out_events.push(Event::ActiveLayerChanged { layer });
            }
        }
        Command::PaintCell { layer, cell, tile } => {
            write_cell(world, &layer, cell, Some(tile), out_events);
        }
        Command::ClearCell { layer, cell } => {
            write_cell(world, &layer, cell, None, out_events);
        }
        Command::ToggleLayerVisibility { layer } => {
            if let Some(entry) = world.layer_mut(&layer) {
                entry.visible = !entry.visible;
                let visible = entry.visible;
                out_events.push(Event::LayerVisibilityChanged { layer, visible });
            }
        }
        Command::SetMode { mode } => {
            if mode == world.mode {
                return;
            }
            world.mode = mode;
            world.accumulator = Duration::ZERO;
            match mode {
                Mode::Play => {
                    world.actor = Some(ActorState::at_cell(playtest::SPAWN_CELL));
                    out_events.push(Event::ModeChanged { mode });
                    out_events.push(Event::ActorSpawned {
                        cell: playtest::SPAWN_CELL,
                    });
                }
                Mode::Edit => {
                    world.actor = None;
                    out_events.push(Event::ModeChanged { mode });
                }
            }
        }
        Command::Tick { dt, input } => {
            run_tick(world, dt, input, out_events);
        }
        Command::ReplaceLevel { level } => {
            if world.mode != Mode::Edit {
                out_events.push(Event::LevelRejected {
                    reason: LevelValidationError::InvalidMode,
                });
                return;
            }
            if let Err(reason) = validate_snapshot(&level) {
                out_events.push(Event::LevelRejected { reason });
                return;
            }
            world.layers = level.layers.into_iter().map(Layer::from_snapshot).collect();
            world.active_layer = world.layers[0].name().clone();
            out_events.push(Event::LevelReplaced);
        }
    }
}

/// Read-only views over the session used by systems and adapters.
pub mod query {
    use super::{is_cell_solid, ActorState, CellCoord, Layer, LayerName, LevelSnapshot, Mode, World};

    /// Current session mode.
    #[must_use]
    pub fn mode(world: &World) -> Mode {
        world.mode
    }

    /// Layer that receives paint operations.
    #[must_use]
    pub fn active_layer(world: &World) -> &LayerName {
        &world.active_layer
    }

    /// Layers in back-to-front rendering order.
    #[must_use]
    pub fn layers(world: &World) -> &[Layer] {
        &world.layers
    }

    /// Named layer, when present.
    #[must_use]
    pub fn layer<'a>(world: &'a World, name: &LayerName) -> Option<&'a Layer> {
        world.layers.iter().find(|layer| layer.name() == name)
    }

    /// Content of one cell of one layer; `None` for unknown layers, empty
    /// cells, and out-of-bounds coordinates alike.
    #[must_use]
    pub fn tile_at(world: &World, name: &LayerName, cell: CellCoord) -> Option<super::TileRef> {
        layer(world, name).and_then(|layer| layer.tile_at(cell))
    }

    /// Playtest actor, present only while the session is in play mode.
    #[must_use]
    pub fn actor(world: &World) -> Option<ActorState> {
        world.actor
    }

    /// Whether the cell blocks the playtest actor's fall.
    #[must_use]
    pub fn is_solid(world: &World, cell: CellCoord) -> bool {
        is_cell_solid(&world.layers, cell)
    }

    /// Serializable copy of the whole level.
    #[must_use]
    pub fn level_snapshot(world: &World) -> LevelSnapshot {
        LevelSnapshot {
            layers: world.layers.iter().map(Layer::to_snapshot).collect(),
        }
    }
}
