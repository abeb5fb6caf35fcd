mod brakes;
mod clutch;
mod engine;
mod transmission;

pub use brakes::*;
pub use clutch::*;
pub use engine::*;
pub use transmission::*;

use super::{CarConfig, ClutchState, PhysicsState, consts::clutch::ENGAGED_PEDAL_THRESHOLD};
use crate::math::RAD_TO_RPM;

/// What the powertrain hands to the chassis for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PowertrainOutput {
    /// Longitudinal force at the driven (front) wheels (N)
    pub drive_force: f32,
    pub brakes: BrakeTorques,
    /// Engine inertia the chassis has to accelerate along with the car (kg)
    pub driveline_mass: f32,
}

/// Advances engine speed, clutch lock state and the stall flags by one tick.
///
/// Reads the smoothed pedals and the forward speed of `state`; writes the rpm,
/// clutch state, idle integral, effective mass and lifecycle flags.
#[must_use]
pub fn update_powertrain(
    mut state: PhysicsState,
    config: &CarConfig,
    dt: f32,
) -> (PhysicsState, PowertrainOutput) {
    let engine = &config.engine;
    let trans = &config.transmission;
    let wheel_radius = config.chassis.wheel_radius;

    let mut throttle = state.throttle;
    if state.engine_on && !state.stalled {
        let assist = idle_assist(
            engine,
            state.rpm,
            state.idle_integral,
            state.gear,
            state.clutch,
            dt,
        );
        throttle = throttle.max(assist.throttle);
        state.idle_integral = assist.integral;
    }

    let torque = engine_torque(engine, state.rpm, throttle, state.engine_on, state.stalled);

    let ratio = trans.total_ratio(state.gear);
    let trans_rpm = transmission_rpm(state.forward_speed(), wheel_radius, ratio);
    let engagement = 1.0 - state.clutch;
    let capacity = clutch_capacity(state.clutch, trans.clutch_max_torque);

    let mass_target = effective_mass_target(engine.flywheel_inertia, ratio, wheel_radius);
    state.effective_mass =
        smooth_effective_mass(state.effective_mass, mass_target, trans.effective_mass_smoothing);

    let clutch_state = state.clutch_state.next(&ClutchConditions {
        gear: state.gear,
        engine_torque: torque,
        capacity,
        rpm: state.rpm,
        transmission_rpm: trans_rpm,
        idle_rpm: engine.idle_rpm,
        hysteresis: trans.clutch_hysteresis,
        anti_stall_idle_ratio: trans.anti_stall_idle_ratio,
    });
    if clutch_state != state.clutch_state {
        log::trace!(
            "clutch {:?} -> {clutch_state:?} at {:.0} rpm (wheels {trans_rpm:.0} rpm)",
            state.clutch_state,
            state.rpm
        );
    }
    state.clutch_state = clutch_state;

    let mut drive_force = 0.0;
    let mut driveline_mass = 0.0;
    let next_rpm = match clutch_state {
        ClutchState::Disengaged => {
            state.rpm + torque / engine.flywheel_inertia * RAD_TO_RPM * dt
        }
        ClutchState::Locked => {
            drive_force = torque * ratio / wheel_radius;
            driveline_mass = state.effective_mass;
            trans_rpm
        }
        ClutchState::Slipping => {
            let transmitted = slip_torque(capacity, state.rpm - trans_rpm);
            let inertia = engine.flywheel_inertia
                + reflected_inertia(config.chassis.mass, wheel_radius, ratio) * engagement;
            drive_force = transmitted * ratio / wheel_radius;
            state.rpm + (torque - transmitted) / inertia * RAD_TO_RPM * dt
        }
    };

    // a locked clutch rolling against the gear yields a negative speed, which is a stall
    state.rpm = next_rpm.max(0.0);

    let engaged = state.clutch < ENGAGED_PEDAL_THRESHOLD && state.gear != 0;
    if state.engine_on && !state.stalled && engaged && state.rpm < engine.stall_rpm {
        log::info!(
            "engine stalled in gear {} at {:.0} km/h",
            state.gear,
            state.speed_kmh
        );
        state.stalled = true;
        state.engine_on = false;
    }

    let output = PowertrainOutput {
        drive_force,
        brakes: BrakeTorques::from_inputs(&config.brakes, state.brake, state.handbrake),
        driveline_mass,
    };

    (state, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn running(rpm: f32) -> PhysicsState {
        PhysicsState {
            engine_on: true,
            rpm,
            ..PhysicsState::DEFAULT
        }
    }

    #[test]
    fn locked_at_standstill_stalls_immediately() {
        let config = CarConfig::CIVILIAN;
        let state = PhysicsState {
            gear: 1,
            clutch: 0.0,
            clutch_state: ClutchState::Locked,
            ..running(800.0)
        };

        let (next, _) = update_powertrain(state, &config, DT);
        assert!(next.stalled);
        assert!(!next.engine_on);
        assert_eq!(next.rpm, 0.0);
    }

    #[test]
    fn rolling_backwards_in_gear_never_goes_negative() {
        let config = CarConfig::CIVILIAN;
        let mut state = PhysicsState {
            gear: 1,
            clutch_state: ClutchState::Locked,
            ..running(1000.0)
        };
        state.local_velocity.x = -2.0;

        let (next, _) = update_powertrain(state, &config, DT);
        assert_eq!(next.rpm, 0.0);
        assert!(next.stalled && !next.engine_on);
    }

    #[test]
    fn neutral_transmits_nothing() {
        let config = CarConfig::CIVILIAN;
        let mut state = running(3000.0);
        state.throttle = 1.0;
        state.local_velocity.x = 10.0;

        let (next, output) = update_powertrain(state, &config, DT);
        assert_eq!(output.drive_force, 0.0);
        assert_eq!(next.clutch_state, ClutchState::Disengaged);
        assert!(next.rpm > 3000.0);
    }

    #[test]
    fn locked_drive_force_follows_ratio() {
        let config = CarConfig::CIVILIAN;
        let ratio = config.transmission.total_ratio(2);
        let speed = 10.0;
        let rpm = transmission_rpm(speed, config.chassis.wheel_radius, ratio);
        let mut state = PhysicsState {
            gear: 2,
            clutch_state: ClutchState::Locked,
            throttle: 1.0,
            ..running(rpm)
        };
        state.local_velocity.x = speed;

        let (next, output) = update_powertrain(state, &config, DT);
        let torque = engine_torque(&config.engine, rpm, 1.0, true, false);
        assert_eq!(next.clutch_state, ClutchState::Locked);
        assert!((next.rpm - rpm).abs() < 1e-3);
        assert!((output.drive_force - torque * ratio / config.chassis.wheel_radius).abs() < 1e-2);
        assert!(output.driveline_mass > 0.0);
    }

    #[test]
    fn reverse_pushes_backwards() {
        let config = CarConfig::CIVILIAN;
        let state = PhysicsState {
            gear: -1,
            clutch: 0.5,
            throttle: 0.5,
            ..running(2000.0)
        };

        let (_, output) = update_powertrain(state, &config, DT);
        assert!(output.drive_force < 0.0);
    }

    #[test]
    fn stall_needs_engaged_clutch() {
        let config = CarConfig::CIVILIAN;
        let state = PhysicsState {
            gear: 1,
            clutch: 1.0,
            ..running(100.0)
        };

        let (next, _) = update_powertrain(state, &config, DT);
        assert!(!next.stalled);
        assert!(next.engine_on);
    }
}
