use super::{
    CarConfig, EnvironmentConfig, InputState, PhysicsState, chassis::update_chassis,
    input::process_inputs, powertrain::update_powertrain,
};

/// One fixed-step tick: input smoothing, then the powertrain, then the chassis.
///
/// Pure: the same state, config, input and `dt` always give the same result.
/// Engine, shift and reset triggers in `input` are left to [`super::Vehicle`].
#[must_use]
pub fn update_physics(
    state: PhysicsState,
    config: &CarConfig,
    env: &EnvironmentConfig,
    input: &InputState,
    dt: f32,
) -> PhysicsState {
    let state = process_inputs(state, config, input, dt);
    let (state, powertrain) = update_powertrain(state, config, dt);
    update_chassis(state, config, env, &powertrain, dt)
}
