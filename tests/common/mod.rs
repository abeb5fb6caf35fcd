mod control_seq;
pub mod quick_inputs;

pub use control_seq::*;

use stickshift::{
    CarConfig, EnvironmentConfig, PhysicsState, sim::ClutchState, update_physics,
};

pub const DT: f32 = 1.0 / 60.0;

/// Engine running at `rpm`, parked, in neutral
pub fn running(rpm: f32) -> PhysicsState {
    PhysicsState {
        engine_on: true,
        rpm,
        ..PhysicsState::DEFAULT
    }
}

/// Rolling straight ahead at `speed` m/s, engine running at `rpm`
pub fn rolling(speed: f32, rpm: f32) -> PhysicsState {
    let mut state = running(rpm);
    state.local_velocity.x = speed;
    state.velocity.x = speed;
    state.with_derived_speed()
}

/// In `gear` with the clutch locked, engine speed matching `speed`
pub fn in_gear(config: &CarConfig, gear: i8, speed: f32) -> PhysicsState {
    let ratio = config.transmission.total_ratio(gear);
    let rpm = speed / config.chassis.wheel_radius * ratio * stickshift::math::RAD_TO_RPM;
    PhysicsState {
        gear,
        clutch_state: ClutchState::Locked,
        ..rolling(speed, rpm)
    }
}

/// Runs the pure pipeline over the whole sequence, returning the state after every tick
pub fn simulate(
    start: PhysicsState,
    config: &CarConfig,
    env: &EnvironmentConfig,
    seq: &ControlSeq,
) -> Vec<PhysicsState> {
    seq.iter()
        .scan(start, |state, input| {
            *state = update_physics(*state, config, env, input, DT);
            Some(*state)
        })
        .collect()
}

pub fn last(states: &[PhysicsState]) -> PhysicsState {
    *states.last().unwrap()
}
