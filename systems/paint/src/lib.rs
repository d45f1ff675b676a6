#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure edit-mode system that turns pointer input into paint commands.

use tilebound_core::{CellCoord, Command, Event, LayerName, Mode, SheetKey, TileRef, Tool};

/// Palette selection identifying which tile the draw tool stamps.
///
/// The offsets address a `64 x 64` region inside whichever sheet the target
/// layer references at paint time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Brush {
    /// Horizontal pixel offset into the sheet.
    pub source_x: u32,
    /// Vertical pixel offset into the sheet.
    pub source_y: u32,
}

impl Brush {
    /// Creates a brush pointing at the given sheet offsets.
    #[must_use]
    pub const fn new(source_x: u32, source_y: u32) -> Self {
        Self { source_x, source_y }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaintInput {
    /// Tool the player applied on this frame, when any.
    pub tool: Option<Tool>,
    /// Cell currently hovered by the cursor, when over the grid.
    pub cursor_cell: Option<CellCoord>,
    /// Palette region the player clicked on this frame, when any.
    pub palette_pick: Option<Brush>,
}

/// Edit-mode system that translates cursor + palette input into cell commands.
#[derive(Clone, Debug)]
pub struct Paint {
    mode: Mode,
    brush: Brush,
}

impl Default for Paint {
    fn default() -> Self {
        Self::new()
    }
}

impl Paint {
    /// Creates a new paint system with the top-left palette tile selected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::Edit,
            brush: Brush::new(0, 0),
        }
    }

    /// Currently selected palette brush.
    #[must_use]
    pub const fn brush(&self) -> Brush {
        self.brush
    }

    /// Consumes world events and adapter-derived input to emit cell commands.
    ///
    /// `target` and `target_sheet` describe the active layer; stamped tiles
    /// always reference the target layer's own sheet, so a brush picked while
    /// one layer was active stays meaningful after switching layers.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: PaintInput,
        target: &LayerName,
        target_sheet: SheetKey,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::ModeChanged { mode } = event {
                self.mode = *mode;
            }
        }

        if self.mode != Mode::Edit {
            return;
        }

        if let Some(pick) = input.palette_pick {
            self.brush = pick;
        }

        let (Some(tool), Some(cell)) = (input.tool, input.cursor_cell) else {
            return;
        };
        match tool {
            Tool::Draw => out.push(Command::PaintCell {
                layer: target.clone(),
                cell,
                tile: TileRef::new(self.brush.source_x, self.brush.source_y, target_sheet),
            }),
            Tool::Erase => out.push(Command::ClearCell {
                layer: target.clone(),
                cell,
            }),
        }
    }
}
