#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure fixed-timestep kinematics for the playtest actor.
//!
//! The session advances the actor by calling [`step`] once per elapsed tick
//! quantum. The function reads an injected [`InputSnapshot`] and samples
//! terrain solidity through a caller-provided closure, so it never touches
//! ambient input or level state and stays testable without a live session.

use std::time::Duration;

use tilebound_core::{grid, ActorState, CellCoord, InputSnapshot};

/// Number of simulation steps per simulated second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Duration of a single simulation step.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICKS_PER_SECOND as u64);

/// Fixed integration timestep in simulated seconds.
pub const TIMESTEP_SECONDS: f32 = 1.0 / TICKS_PER_SECOND as f32;

/// Horizontal run speed in cell units per simulated second.
pub const RUN_SPEED: f32 = 6.0;

/// Downward acceleration in cell units per simulated second squared.
pub const GRAVITY: f32 = 30.0;

/// Terminal fall speed in cell units per simulated second.
pub const MAX_FALL_SPEED: f32 = 18.0;

/// Instantaneous upward velocity applied on a successful jump.
pub const JUMP_IMPULSE: f32 = -12.0;

/// Fractional offset below the actor's position sampled as its feet.
pub const FEET_OFFSET: f32 = 0.25;

/// Cell the actor occupies when a playtest session begins.
pub const SPAWN_CELL: CellCoord = CellCoord::new(2, 8);

/// Observable side effects of a single simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The actor launched a jump during this step.
    pub jumped: bool,
    /// The actor transitioned from airborne to grounded during this step.
    pub landed: bool,
}

/// Advances the actor by exactly one tick quantum.
///
/// The `is_solid` closure reports whether a foreground cell blocks the
/// actor's fall; out-of-bounds samples are treated as empty. The check is
/// one-sided: only downward motion collides, so a rising actor passes
/// through terrain unimpeded.
pub fn step<F>(actor: &mut ActorState, input: InputSnapshot, is_solid: F) -> StepOutcome
where
    F: Fn(CellCoord) -> bool,
{
    let mut outcome = StepOutcome::default();

    // Instantaneous horizontal velocity; the later check wins when both
    // directions are held.
    actor.velocity_x = 0.0;
    if input.move_left {
        actor.velocity_x = -RUN_SPEED;
    }
    if input.move_right {
        actor.velocity_x = RUN_SPEED;
    }

    actor.velocity_y = (actor.velocity_y + GRAVITY * TIMESTEP_SECONDS).min(MAX_FALL_SPEED);

    if input.jump_pressed && actor.grounded {
        actor.velocity_y = JUMP_IMPULSE;
        actor.grounded = false;
        outcome.jumped = true;
    }

    let tentative_x = actor.x + actor.velocity_x * TIMESTEP_SECONDS;
    let tentative_y = actor.y + actor.velocity_y * TIMESTEP_SECONDS;
    let was_grounded = actor.grounded;

    actor.x = tentative_x;
    actor.y = tentative_y;
    actor.grounded = false;

    if actor.velocity_y >= 0.0 {
        let column = (tentative_x + 0.5).floor() as i32;
        let feet_row = (tentative_y + FEET_OFFSET).floor() as i32;
        if let Some(cell) = grid::cell_in_bounds(column, feet_row) {
            if is_solid(cell) {
                actor.y = cell.row() as f32;
                actor.velocity_y = 0.0;
                actor.grounded = true;
                outcome.landed = !was_grounded;
            }
        }
    }

    let (clamped_x, clamped_y) = grid::clamp_position(actor.x, actor.y);
    actor.x = clamped_x;
    actor.y = clamped_y;

    outcome
}

#[cfg(test)]
mod tests {
    use super::{
        step, StepOutcome, FEET_OFFSET, GRAVITY, JUMP_IMPULSE, MAX_FALL_SPEED, RUN_SPEED,
        SPAWN_CELL, TIMESTEP_SECONDS,
    };
    use tilebound_core::{ActorState, CellCoord, InputSnapshot, GRID_COLUMNS, GRID_ROWS};

    fn solid_at(cell: CellCoord) -> impl Fn(CellCoord) -> bool {
        move |probe| probe == cell
    }

    fn no_terrain(_cell: CellCoord) -> bool {
        false
    }

    #[test]
    fn right_input_overrides_left_when_both_held() {
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        let input = InputSnapshot {
            move_left: true,
            move_right: true,
            jump_pressed: false,
        };

        let _ = step(&mut actor, input, no_terrain);

        assert_eq!(actor.velocity_x, RUN_SPEED);
    }

    #[test]
    fn held_keys_set_velocity_instantaneously() {
        let mut actor = ActorState::at_cell(SPAWN_CELL);

        let _ = step(
            &mut actor,
            InputSnapshot {
                move_left: true,
                ..InputSnapshot::default()
            },
            no_terrain,
        );
        assert_eq!(actor.velocity_x, -RUN_SPEED);

        let _ = step(&mut actor, InputSnapshot::default(), no_terrain);
        assert_eq!(actor.velocity_x, 0.0, "released keys zero the velocity");
    }

    #[test]
    fn gravity_accumulates_and_clamps_to_terminal_speed() {
        let mut actor = ActorState::at_cell(CellCoord::new(2, 0));

        let _ = step(&mut actor, InputSnapshot::default(), no_terrain);
        let expected = GRAVITY * TIMESTEP_SECONDS;
        assert!((actor.velocity_y - expected).abs() < 1e-6);

        for _ in 0..600 {
            let _ = step(&mut actor, InputSnapshot::default(), no_terrain);
        }
        assert_eq!(actor.velocity_y, MAX_FALL_SPEED);
    }

    #[test]
    fn actor_above_solid_cell_comes_to_rest_on_it() {
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        let terrain = solid_at(CellCoord::new(2, 9));

        let mut landed_after = None;
        for tick in 0..240 {
            let outcome = step(&mut actor, InputSnapshot::default(), &terrain);
            if outcome.landed {
                landed_after = Some(tick);
            }
        }

        assert!(landed_after.is_some(), "actor must ground within 240 ticks");
        assert_eq!(actor.y, 9.0, "vertical position snaps to the solid row");
        assert_eq!(actor.x, 2.0, "horizontal position is untouched");
        assert_eq!(actor.velocity_y, 0.0);
        assert!(actor.grounded);
    }

    #[test]
    fn grounded_actor_keeps_zero_vertical_velocity() {
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        let terrain = solid_at(CellCoord::new(2, 9));
        for _ in 0..240 {
            let _ = step(&mut actor, InputSnapshot::default(), &terrain);
        }

        for _ in 0..60 {
            let outcome = step(&mut actor, InputSnapshot::default(), &terrain);
            assert_eq!(actor.velocity_y, 0.0);
            assert!(actor.grounded);
            assert_eq!(outcome, StepOutcome::default());
        }
    }

    #[test]
    fn jump_applies_impulse_exactly_once_until_regrounded() {
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        let terrain = solid_at(CellCoord::new(2, 9));
        for _ in 0..240 {
            let _ = step(&mut actor, InputSnapshot::default(), &terrain);
        }
        assert!(actor.grounded);

        let jump = InputSnapshot {
            jump_pressed: true,
            ..InputSnapshot::default()
        };
        let outcome = step(&mut actor, jump, &terrain);
        assert!(outcome.jumped);
        assert!(!actor.grounded);
        let expected = JUMP_IMPULSE + GRAVITY * TIMESTEP_SECONDS;
        assert!(
            (actor.velocity_y - expected).abs() < 1e-5,
            "impulse replaces the accumulated fall speed"
        );

        let velocity_before = actor.velocity_y;
        let outcome = step(&mut actor, jump, &terrain);
        assert!(!outcome.jumped, "airborne jump input must be ignored");
        assert!(
            actor.velocity_y > velocity_before,
            "only gravity acts while airborne"
        );
    }

    #[test]
    fn jumping_actor_lands_back_on_its_platform() {
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        let terrain = solid_at(CellCoord::new(2, 9));
        for _ in 0..240 {
            let _ = step(&mut actor, InputSnapshot::default(), &terrain);
        }

        let jump = InputSnapshot {
            jump_pressed: true,
            ..InputSnapshot::default()
        };
        let _ = step(&mut actor, jump, &terrain);

        let mut landed = false;
        for _ in 0..240 {
            let outcome = step(&mut actor, InputSnapshot::default(), &terrain);
            landed |= outcome.landed;
        }
        assert!(landed);
        assert_eq!(actor.y, 9.0);
        assert!(actor.grounded);
    }

    #[test]
    fn one_second_of_right_input_displaces_by_run_speed() {
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        let input = InputSnapshot {
            move_right: true,
            ..InputSnapshot::default()
        };

        for _ in 0..60 {
            let _ = step(&mut actor, input, no_terrain);
        }

        let expected = SPAWN_CELL.column() as f32 + RUN_SPEED;
        assert!(
            (actor.x - expected).abs() < 1e-3,
            "expected x close to {expected}, got {}",
            actor.x
        );
        assert!(actor.x <= (GRID_COLUMNS - 1) as f32);
    }

    #[test]
    fn position_clamps_to_grid_extent() {
        let mut actor = ActorState::at_cell(CellCoord::new(0, 8));
        let input = InputSnapshot {
            move_left: true,
            ..InputSnapshot::default()
        };
        for _ in 0..120 {
            let _ = step(&mut actor, input, no_terrain);
        }
        assert_eq!(actor.x, 0.0);

        let mut actor = ActorState::at_cell(CellCoord::new(2, 0));
        for _ in 0..1200 {
            let _ = step(&mut actor, InputSnapshot::default(), no_terrain);
        }
        assert_eq!(actor.y, (GRID_ROWS - 1) as f32);
        assert!(!actor.grounded, "the grid floor is a clamp, not terrain");
    }

    #[test]
    fn walking_off_a_ledge_clears_grounded() {
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        let terrain = solid_at(CellCoord::new(2, 9));
        for _ in 0..240 {
            let _ = step(&mut actor, InputSnapshot::default(), &terrain);
        }
        assert!(actor.grounded);

        let input = InputSnapshot {
            move_right: true,
            ..InputSnapshot::default()
        };
        // Far enough that the sampled column leaves the platform.
        for _ in 0..30 {
            let _ = step(&mut actor, input, &terrain);
        }
        assert!(!actor.grounded);
    }

    #[test]
    fn feet_sample_uses_fractional_offset() {
        let terrain = solid_at(CellCoord::new(2, 9));

        // Just above the offset threshold the feet still sample row 8.
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        actor.y = 9.0 - FEET_OFFSET - 0.05;
        let outcome = step(&mut actor, InputSnapshot::default(), &terrain);
        assert!(!outcome.landed);

        // Past the threshold the feet reach row 9 and the actor snaps onto it.
        let mut actor = ActorState::at_cell(SPAWN_CELL);
        actor.y = 9.0 - FEET_OFFSET + 0.01;
        let outcome = step(&mut actor, InputSnapshot::default(), &terrain);
        assert!(outcome.landed);
        assert_eq!(actor.y, 9.0);
    }
}
