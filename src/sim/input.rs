use super::{
    CarConfig, ControlsConfig, HandbrakeMode, InputState, PedalNudge, PhysicsState, SteerNudge,
    VirtualPedals,
    consts::input::{HANDBRAKE_PULLED_THRESHOLD, VIRTUAL_PEDAL_RATE},
};
use crate::math::{exp_smooth, move_towards};

fn update_virtual_pedal(current: f32, nudge: PedalNudge, dt: f32) -> f32 {
    if nudge.set_full {
        return 1.0;
    }
    if nudge.set_zero {
        return 0.0;
    }

    let mut delta = 0.0;
    if nudge.increase {
        delta += VIRTUAL_PEDAL_RATE * dt;
    }
    if nudge.decrease {
        delta -= VIRTUAL_PEDAL_RATE * dt;
    }

    (current + delta).clamp(0.0, 1.0)
}

fn update_virtual_steering(current: f32, nudge: SteerNudge, dt: f32) -> f32 {
    if nudge.full_left {
        return -1.0;
    }
    if nudge.full_right {
        return 1.0;
    }

    let mut delta = 0.0;
    if nudge.left {
        delta -= VIRTUAL_PEDAL_RATE * dt;
    }
    if nudge.right {
        delta += VIRTUAL_PEDAL_RATE * dt;
    }

    (current + delta).clamp(-1.0, 1.0)
}

fn update_virtual_pedals(current: VirtualPedals, input: &InputState, dt: f32) -> VirtualPedals {
    let digital_throttle = input.throttle && input.throttle_analog.is_none();
    let digital_steer = input.left || input.right;

    VirtualPedals {
        // holding the real throttle key takes over from the stepped one
        throttle: if digital_throttle {
            0.0
        } else {
            update_virtual_pedal(current.throttle, input.virtual_throttle, dt)
        },
        brake: update_virtual_pedal(current.brake, input.virtual_brake, dt),
        clutch: update_virtual_pedal(current.clutch, input.virtual_clutch, dt),
        steering: if digital_steer {
            0.0
        } else {
            update_virtual_steering(current.steering, input.virtual_steering, dt)
        },
    }
}

/// Analog value, else fully pressed key, else the virtual pedal
fn pedal_target(analog: Option<f32>, pressed: bool, virtual_value: f32) -> f32 {
    match analog {
        Some(value) => value.clamp(0.0, 1.0),
        None if pressed => 1.0,
        None => virtual_value,
    }
}

fn process_handbrake(
    state: &PhysicsState,
    input: &InputState,
    controls: &ControlsConfig,
    dt: f32,
) -> (f32, bool) {
    match controls.handbrake_mode {
        HandbrakeMode::Ratchet { rate } => {
            let pulled = state.handbrake_pulled ^ input.triggers.toggle_handbrake;
            let target = if pulled { 1.0 } else { 0.0 };
            (move_towards(state.handbrake, target, rate * dt), pulled)
        }
        HandbrakeMode::Continuous => {
            let target = pedal_target(input.handbrake_analog, input.handbrake, 0.0);
            let value = exp_smooth(state.handbrake, target, controls.handbrake_tau(), dt);
            (value, value > HANDBRAKE_PULLED_THRESHOLD)
        }
    }
}

fn steering_target(input: &InputState, virtual_steering: f32) -> f32 {
    if let Some(value) = input.steering_analog {
        return value.clamp(-1.0, 1.0);
    }

    if input.left || input.right {
        // both held cancels out
        f32::from(u8::from(input.right)) - f32::from(u8::from(input.left))
    } else {
        virtual_steering
    }
}

fn process_steering(
    state: &PhysicsState,
    controls: &ControlsConfig,
    max_angle: f32,
    target: f32,
    dt: f32,
) -> f32 {
    let tau = if target == 0.0 {
        controls.steering_return_tau
    } else {
        controls
            .steering_curve
            .get_output(state.forward_speed().abs())
    };

    exp_smooth(state.steering_wheel_angle, target * max_angle, tau, dt).clamp(-max_angle, max_angle)
}

/// Smooths the raw controls of one tick into bounded pedal, handbrake and steering positions.
///
/// Reads the forward speed of `state` for the speed-dependent steering response and
/// updates the virtual pedal accumulators. Nothing downstream of the controls is touched.
#[must_use]
pub fn process_inputs(
    mut state: PhysicsState,
    config: &CarConfig,
    input: &InputState,
    dt: f32,
) -> PhysicsState {
    let input = input.clamp();
    let controls = &config.controls;

    let virtuals = update_virtual_pedals(state.virtual_pedals, &input, dt);

    let throttle_target = pedal_target(input.throttle_analog, input.throttle, virtuals.throttle);
    let brake_target = pedal_target(input.brake_analog, input.brake, virtuals.brake);
    let clutch_target = pedal_target(input.clutch_analog, input.clutch, virtuals.clutch);

    state.throttle =
        exp_smooth(state.throttle, throttle_target, controls.throttle_tau, dt).clamp(0.0, 1.0);
    state.brake = exp_smooth(state.brake, brake_target, controls.brake_tau, dt).clamp(0.0, 1.0);
    state.clutch = exp_smooth(state.clutch, clutch_target, controls.clutch_tau, dt).clamp(0.0, 1.0);

    let (handbrake, handbrake_pulled) = process_handbrake(&state, &input, controls, dt);
    state.handbrake = handbrake.clamp(0.0, 1.0);
    state.handbrake_pulled = handbrake_pulled;

    let max_angle = config.chassis.max_steering_wheel_angle;
    let target = steering_target(&input, virtuals.steering);
    state.steering_wheel_angle = process_steering(&state, controls, max_angle, target, dt);
    state.steer_angle = (state.steering_wheel_angle / config.chassis.steering_ratio).to_radians();

    state.virtual_pedals = virtuals;
    state
}
