#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Tilebound editor session.

mod level_transfer;

use std::{fs, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use tilebound_core::{
    CellCoord, Command, Event, Mode, SheetKey, CELL_LENGTH, GRID_COLUMNS, GRID_ROWS,
};
use tilebound_rendering::{
    AudioCue, Color, FrameInput, GridPresentation, LayerPanelEntry, PalettePick,
    PalettePresentation, Presentation, RenderingBackend, Scene, SceneLayer, ScenePlayer, SceneTile,
};
use tilebound_rendering_macroquad::MacroquadBackend;
use tilebound_system_paint::{Brush, Paint, PaintInput};
use tilebound_world::{apply, query, World};

const WINDOW_TITLE: &str = "Tilebound";
const CLEAR_COLOR: Color = Color::new(0.10, 0.11, 0.13, 1.0);
const GRID_LINE_COLOR: Color = Color::new(0.30, 0.30, 0.34, 1.0);

/// Command-line options accepted by the Tilebound binary.
#[derive(Debug, Parser)]
#[command(name = "tilebound", about = "A 2D tile-map editor with an embedded playtest mode")]
struct Args {
    /// Disables vertical sync so frames render as fast as possible.
    #[arg(long)]
    no_vsync: bool,
    /// Prints a frames-per-second line once per second.
    #[arg(long)]
    show_fps: bool,
    /// Skips sheet loading and draws flat placeholder cells instead.
    #[arg(long)]
    no_sprites: bool,
    /// Path of the save slot used by the save and load actions.
    #[arg(long, default_value = "tilebound.save")]
    save_path: PathBuf,
}

/// Single-file save slot backing the save and load actions.
///
/// Saving is fire-and-forget: a failed write is reported on stderr and the
/// session keeps running with its in-memory level untouched.
#[derive(Debug)]
struct SaveSlot {
    path: PathBuf,
}

impl SaveSlot {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn save(&self, contents: &str) {
        if let Err(error) = fs::write(&self.path, contents) {
            eprintln!(
                "warning: could not save level to {}: {error}",
                self.path.display()
            );
        }
    }

    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents),
            Err(error) => {
                eprintln!(
                    "warning: could not read level from {}: {error}",
                    self.path.display()
                );
                None
            }
        }
    }
}

/// Entry point for the Tilebound command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut world = World::new();
    let mut paint = Paint::new();
    let save_slot = SaveSlot::new(args.save_path);

    let grid = GridPresentation::new(GRID_COLUMNS, GRID_ROWS, CELL_LENGTH, GRID_LINE_COLOR)?;
    let mut scene = Scene::new(
        grid,
        Vec::new(),
        None,
        query::mode(&world),
        palette_presentation(&world, &paint),
        Vec::new(),
    );
    refresh_scene(&world, &paint, &mut scene);
    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene);

    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);

    backend.run(presentation, move |dt, input, scene| {
        let FrameInput {
            mode_toggle,
            save_requested,
            load_requested,
            cursor_cell,
            tool,
            palette_pick,
            layer_selected,
            layer_visibility_toggled,
            held,
        } = input;

        let mut events = Vec::new();

        if mode_toggle {
            let mode = match query::mode(&world) {
                Mode::Edit => Mode::Play,
                Mode::Play => Mode::Edit,
            };
            apply(&mut world, Command::SetMode { mode }, &mut events);
        }
        if let Some(layer) = layer_selected {
            apply(&mut world, Command::SetActiveLayer { layer }, &mut events);
        }
        if let Some(layer) = layer_visibility_toggled {
            apply(
                &mut world,
                Command::ToggleLayerVisibility { layer },
                &mut events,
            );
        }
        apply(&mut world, Command::Tick { dt, input: held }, &mut events);

        // The paint system reacts to this frame's events and pointer input,
        // targeting whichever layer is active after the batch above.
        let target = query::active_layer(&world).clone();
        let target_sheet = query::layer(&world, &target)
            .map(|layer| layer.sheet())
            .unwrap_or(SheetKey::Background);
        let paint_input = PaintInput {
            tool,
            cursor_cell,
            palette_pick: palette_pick.map(|pick| Brush::new(pick.source_x, pick.source_y)),
        };
        let mut paint_commands = Vec::new();
        paint.handle(&events, paint_input, &target, target_sheet, &mut paint_commands);
        for command in paint_commands {
            apply(&mut world, command, &mut events);
        }

        if save_requested {
            let encoded = level_transfer::encode(&query::level_snapshot(&world));
            save_slot.save(&encoded);
        }
        if load_requested {
            match save_slot.load().map(|contents| level_transfer::decode(&contents)) {
                Some(Ok(level)) => {
                    apply(&mut world, Command::ReplaceLevel { level }, &mut events);
                }
                Some(Err(error)) => eprintln!("no level loaded: {error}"),
                None => {}
            }
        }

        let mut jump_started = false;
        for event in &events {
            match event {
                Event::JumpStarted => jump_started = true,
                Event::LevelRejected { reason } => {
                    eprintln!("no level loaded: snapshot rejected ({reason:?})");
                }
                _ => {}
            }
        }

        if !events.is_empty() {
            refresh_scene(&world, &paint, scene);
        }
        if jump_started {
            scene.audio_cues.push(AudioCue::Jump);
        }
    })
}

/// Rebuilds the scene's map, panel and actor content from the session state.
///
/// The grid descriptor and any queued audio cues are left untouched.
fn refresh_scene(world: &World, paint: &Paint, scene: &mut Scene) {
    scene.layers = scene_layers(world);
    scene.player = query::actor(world)
        .map(|actor| ScenePlayer::new(Vec2::new(actor.x, actor.y)));
    scene.mode = query::mode(world);
    scene.palette = palette_presentation(world, paint);
    scene.layer_panel = layer_panel_entries(world);
}

fn scene_layers(world: &World) -> Vec<SceneLayer> {
    query::layers(world)
        .iter()
        .filter(|layer| layer.visible())
        .map(|layer| {
            let mut tiles = Vec::new();
            for row in 0..GRID_ROWS {
                for column in 0..GRID_COLUMNS {
                    let cell = CellCoord::new(column, row);
                    if let Some(tile) = layer.tile_at(cell) {
                        tiles.push(SceneTile::new(cell, tile));
                    }
                }
            }
            SceneLayer::new(layer.name().clone(), layer.sheet(), tiles)
        })
        .collect()
}

fn palette_presentation(world: &World, paint: &Paint) -> PalettePresentation {
    let active = query::active_layer(world);
    let sheet = query::layer(world, active)
        .map(|layer| layer.sheet())
        .unwrap_or(SheetKey::Background);
    let brush = paint.brush();
    PalettePresentation::new(sheet, PalettePick::new(brush.source_x, brush.source_y))
}

fn layer_panel_entries(world: &World) -> Vec<LayerPanelEntry> {
    let active = query::active_layer(world).clone();
    query::layers(world)
        .iter()
        .map(|layer| {
            LayerPanelEntry::new(layer.name().clone(), layer.visible(), layer.name() == &active)
        })
        .collect()
}
