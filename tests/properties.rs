//! Randomized invariants of the tick pipeline

#![allow(unused)]

mod common;

use glam::Vec2;
use proptest::prelude::*;
use stickshift::{
    CarConfig, CarPreset, EnvironmentConfig, InputState, PhysicsState, Vehicle,
    replay::Replay,
    sim::{
        PedalNudge, SteerNudge, StoppingState, Triggers,
        chassis::tire_forces,
        powertrain::{BrakeTorques, PowertrainOutput},
    },
};

use crate::common::DT;

fn arb_preset() -> impl Strategy<Value = CarConfig> {
    prop::sample::select(CarPreset::ALL.to_vec()).prop_map(CarPreset::config)
}

fn arb_nudge() -> impl Strategy<Value = PedalNudge> {
    prop::array::uniform4(prop::bool::weighted(0.2)).prop_map(
        |[increase, decrease, set_full, set_zero]| PedalNudge {
            increase,
            decrease,
            set_full,
            set_zero,
        },
    )
}

fn arb_triggers() -> impl Strategy<Value = Triggers> {
    prop::array::uniform5(prop::bool::weighted(0.05)).prop_map(
        |[toggle_engine, shift_up, shift_down, reset, toggle_handbrake]| Triggers {
            toggle_engine,
            shift_up,
            shift_down,
            reset,
            toggle_handbrake,
        },
    )
}

fn arb_input() -> impl Strategy<Value = InputState> {
    (
        prop::array::uniform6(any::<bool>()),
        prop::array::uniform4(prop::option::of(0.0f32..=1.0)),
        prop::option::of(-1.0f32..=1.0),
        (arb_nudge(), arb_nudge(), arb_nudge()),
        prop::array::uniform4(prop::bool::weighted(0.2)),
        arb_triggers(),
    )
        .prop_map(
            |(keys, analogs, steering_analog, nudges, steer_nudge, triggers)| {
                let [throttle, brake, clutch, handbrake, left, right] = keys;
                let [throttle_analog, brake_analog, clutch_analog, handbrake_analog] = analogs;
                let [steer_left, steer_right, full_left, full_right] = steer_nudge;
                InputState {
                    throttle,
                    brake,
                    clutch,
                    handbrake,
                    left,
                    right,
                    throttle_analog,
                    brake_analog,
                    clutch_analog,
                    handbrake_analog,
                    steering_analog,
                    virtual_throttle: nudges.0,
                    virtual_brake: nudges.1,
                    virtual_clutch: nudges.2,
                    virtual_steering: SteerNudge {
                        left: steer_left,
                        right: steer_right,
                        full_left,
                        full_right,
                    },
                    triggers,
                }
            },
        )
}

/// Blocks of held inputs; triggers only fire on the first tick of a block
fn arb_sequence() -> impl Strategy<Value = Vec<(InputState, usize)>> {
    prop::collection::vec((arb_input(), 1usize..30), 1..10)
}

fn arb_start(config: CarConfig) -> impl Strategy<Value = PhysicsState> {
    let max_gear = config.transmission.max_gear();
    let idle = config.engine.idle_rpm;
    let redline = config.engine.redline_rpm;
    (-5.0f32..20.0, -1..=max_gear, any::<bool>(), idle..redline).prop_map(
        move |(speed, gear, engine_on, rpm)| {
            let mut state = PhysicsState {
                gear,
                engine_on,
                rpm: if engine_on { rpm } else { 0.0 },
                ..PhysicsState::DEFAULT
            };
            state.local_velocity.x = speed;
            state.velocity.x = speed;
            state.with_derived_speed()
        },
    )
}

fn check_invariants(state: &PhysicsState, config: &CarConfig) -> Result<(), TestCaseError> {
    prop_assert!(state.rpm >= 0.0, "rpm {}", state.rpm);
    for (name, pedal) in [
        ("throttle", state.throttle),
        ("brake", state.brake),
        ("clutch", state.clutch),
        ("handbrake", state.handbrake),
    ] {
        prop_assert!((0.0..=1.0).contains(&pedal), "{name} {pedal}");
    }
    prop_assert!(
        state.steering_wheel_angle.abs() <= config.chassis.max_steering_wheel_angle,
        "wheel {}",
        state.steering_wheel_angle
    );
    prop_assert!(!(state.stalled && state.engine_on));
    if state.stopping_state == StoppingState::Stopped {
        prop_assert_eq!(state.velocity, Vec2::ZERO);
        prop_assert_eq!(state.local_velocity, Vec2::ZERO);
    }
    prop_assert!(state.gear >= -1 && state.gear <= config.transmission.max_gear());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_driving_keeps_invariants(
        (config, start) in arb_preset().prop_flat_map(|config| (Just(config), arb_start(config))),
        sequence in arb_sequence(),
        slope in -0.3f32..0.3,
    ) {
        let mut vehicle = Vehicle::new(config, EnvironmentConfig::with_slope(slope), start);

        for (input, ticks) in sequence {
            vehicle.step(&input);
            check_invariants(&vehicle.state, &config)?;

            let held = input.without_triggers();
            for _ in 1..ticks {
                vehicle.step(&held);
                check_invariants(&vehicle.state, &config)?;
            }
        }
    }

    #[test]
    fn tire_forces_stay_in_friction_circle(
        config in arb_preset(),
        vx in -30.0f32..30.0,
        vy in -5.0f32..5.0,
        yaw_rate in -2.0f32..2.0,
        steer_angle in -0.6f32..0.6,
        last_ax in -12.0f32..12.0,
        drive_force in -30_000.0f32..30_000.0,
        brake in 0.0f32..=1.0,
        handbrake in 0.0f32..=1.0,
        slope in -0.3f32..0.3,
    ) {
        let mut state = PhysicsState {
            yaw_rate,
            steer_angle,
            last_ax,
            ..PhysicsState::DEFAULT
        };
        state.local_velocity = Vec2::new(vx, vy);
        let output = PowertrainOutput {
            drive_force,
            brakes: BrakeTorques::from_inputs(&config.brakes, brake, handbrake),
            driveline_mass: 0.0,
        };

        let forces = tire_forces(
            &state,
            &config,
            &EnvironmentConfig::with_slope(slope),
            &output,
            DT,
        );
        let mu = config.chassis.tire_friction;
        prop_assert!(forces.front.length() <= mu * forces.loads.front * (1.0 + 1e-4) + 1e-3);
        prop_assert!(forces.rear.length() <= mu * forces.loads.rear * (1.0 + 1e-4) + 1e-3);

        // resistance never points along the direction of travel
        prop_assert!(forces.resistive.total() * vx <= 0.0);
    }

    #[test]
    fn replay_stream_decodes_to_the_same_inputs(
        inputs in prop::collection::vec(arb_input(), 0..50),
        x in -1000.0f32..1000.0,
        y in -1000.0f32..1000.0,
        heading in -3.2f32..3.2,
    ) {
        let replay = Replay {
            tick_rate: 60,
            start_position: Vec2::new(x, y),
            start_heading: heading,
            inputs,
        };
        prop_assert_eq!(Replay::from_bytes(&replay.to_bytes().unwrap()).unwrap(), replay);
    }
}
