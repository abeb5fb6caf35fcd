mod kinematic;
mod load_transfer;
mod stopping;
mod tire;

pub use kinematic::*;
pub use load_transfer::*;
pub use stopping::*;
pub use tire::*;

use glam::Vec2;

use super::{
    CarConfig, EnvironmentConfig, PhysicsState, StoppingState,
    consts::{
        GRAVITY,
        chassis::{ACCEL_FILTER_TAU, STOPPING_BRAKE_SCALE},
    },
    powertrain::PowertrainOutput,
};
use crate::math::{body_to_world, lerp, low_pass, sign};

/// Per-axle tire forces in the wheel frame, `x` longitudinal and `y` lateral (N)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChassisForces {
    pub front: Vec2,
    pub rear: Vec2,
    pub loads: AxleLoads,
    pub resistive: ResistiveForces,
}

/// Mass the longitudinal forces act on, including the engine inertia seen through a locked clutch
#[must_use]
pub fn longitudinal_mass(config: &CarConfig, powertrain: &PowertrainOutput) -> f32 {
    config.chassis.mass + powertrain.driveline_mass
}

/// Largest resistive force that can be applied this tick without reversing the car
#[must_use]
pub fn resistive_force_cap(forward_speed: f32, mass: f32, dt: f32) -> f32 {
    mass * forward_speed.abs() / dt
}

/// Brake, rolling and aerodynamic forces, signed against the direction of travel (N)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResistiveForces {
    pub brake_front: f32,
    pub brake_rear: f32,
    pub rolling: f32,
    pub drag: f32,
}

impl ResistiveForces {
    #[must_use]
    pub fn total(&self) -> f32 {
        self.brake_front + self.brake_rear + self.rolling + self.drag
    }
}

/// Combined resistance never exceeds what is needed to bring the car to rest
/// within the tick. Brakes take priority, then rolling resistance, then drag.
#[must_use]
pub fn resistive_forces(
    state: &PhysicsState,
    config: &CarConfig,
    env: &EnvironmentConfig,
    powertrain: &PowertrainOutput,
    dt: f32,
) -> ResistiveForces {
    let chassis = &config.chassis;
    let vx = state.local_velocity.x;
    let direction = -sign(vx);
    let mut cap = resistive_force_cap(vx, longitudinal_mass(config, powertrain), dt);

    // fade the brakes out while settling to keep them from chattering around zero speed
    let brake_scale = if state.stopping_state == StoppingState::Stopping {
        (vx.abs() * STOPPING_BRAKE_SCALE).min(1.0)
    } else {
        1.0
    };
    let front = powertrain.brakes.front / chassis.wheel_radius * brake_scale;
    let rear = powertrain.brakes.rear / chassis.wheel_radius * brake_scale;
    let brakes = front + rear;
    let brake_share = if brakes > cap { cap / brakes } else { 1.0 };
    cap = (cap - brakes).max(0.0);

    let weight = chassis.mass * GRAVITY * env.slope.cos();
    let rolling = (chassis.rolling_resistance * weight).min(cap);
    cap -= rolling;

    let drag = (chassis.drag_coefficient * vx * vx).min(cap);

    ResistiveForces {
        brake_front: direction * front * brake_share,
        brake_rear: direction * rear * brake_share,
        rolling: direction * rolling,
        drag: direction * drag,
    }
}

/// Tire forces of both axles for the current state, after the friction circle
#[must_use]
pub fn tire_forces(
    state: &PhysicsState,
    config: &CarConfig,
    env: &EnvironmentConfig,
    powertrain: &PowertrainOutput,
    dt: f32,
) -> ChassisForces {
    let chassis = &config.chassis;
    let loads = axle_loads(chassis, state.last_ax, env.slope);

    let slip = slip_angles(
        state.local_velocity,
        state.yaw_rate,
        state.steer_angle,
        chassis.cg_to_front,
        chassis.cg_to_rear(),
    );
    let lateral_front = lateral_force(
        chassis.cornering_stiffness_front,
        slip.front,
        chassis.tire_friction,
        loads.front,
    );
    let lateral_rear = lateral_force(
        chassis.cornering_stiffness_rear,
        slip.rear,
        chassis.tire_friction,
        loads.rear,
    );

    let resistive = resistive_forces(state, config, env, powertrain, dt);

    let front = friction_circle(
        Vec2::new(powertrain.drive_force + resistive.brake_front, lateral_front),
        chassis.tire_friction,
        loads.front,
    );
    let rear = friction_circle(
        Vec2::new(resistive.brake_rear, lateral_rear),
        chassis.tire_friction,
        loads.rear,
    );

    ChassisForces {
        front,
        rear,
        loads,
        resistive,
    }
}

/// Advances stop detection, body velocities, heading and position by one tick
#[must_use]
pub fn update_chassis(
    mut state: PhysicsState,
    config: &CarConfig,
    env: &EnvironmentConfig,
    powertrain: &PowertrainOutput,
    dt: f32,
) -> PhysicsState {
    let chassis = &config.chassis;
    let gravity_force = gravity_along_slope(chassis.mass, env.slope);

    let (stopping_state, stop_timer) = state.stopping_state.next(
        state.stop_timer,
        &StopConditions {
            forward_speed: state.forward_speed(),
            braking: powertrain.brakes.is_braking(),
            holding_force: powertrain.brakes.total() / chassis.wheel_radius,
            net_propulsion: powertrain.drive_force + gravity_force,
        },
        &config.feel,
        dt,
    );
    if stopping_state != state.stopping_state {
        log::trace!(
            "stopping {:?} -> {stopping_state:?} at {:.3} m/s",
            state.stopping_state,
            state.forward_speed()
        );
    }
    state.stopping_state = stopping_state;
    state.stop_timer = stop_timer;

    if stopping_state == StoppingState::Stopped {
        state.velocity = Vec2::ZERO;
        state.local_velocity = Vec2::ZERO;
        state.yaw_rate = 0.0;
        state.last_ax = 0.0;
        state.last_ay = 0.0;
        return state.with_derived_speed();
    }

    let forces = tire_forces(&state, config, env, powertrain, dt);
    let (front, rear) = (forces.front, forces.rear);

    let Vec2 { x: vx, y: vy } = state.local_velocity;
    let yaw_rate = state.yaw_rate;
    let (steer_sin, steer_cos) = state.steer_angle.sin_cos();
    let mass_long = longitudinal_mass(config, powertrain);

    let resistance = forces.resistive.rolling + forces.resistive.drag;

    let force_x = front.x * steer_cos + rear.x - front.y * steer_sin + resistance + gravity_force;
    let force_y = front.y * steer_cos + rear.y + front.x * steer_sin;
    let front_lateral = front.y * steer_cos + front.x * steer_sin;
    let moment = front_lateral * chassis.cg_to_front - rear.y * chassis.cg_to_rear();

    let ax = force_x / mass_long + vy * yaw_rate;
    let ay = force_y / chassis.mass - vx * yaw_rate;
    let yaw_accel = moment / chassis.yaw_inertia;

    let next_vx = vx + ax * dt;
    let dynamic_vy = vy + ay * dt;
    let dynamic_yaw_rate = yaw_rate + yaw_accel * dt;

    let blend = dynamic_blend(&config.feel, vx);
    let kinematic = kinematic_motion(
        vx,
        state.steer_angle,
        chassis.cg_to_rear(),
        chassis.wheelbase,
    );
    let next_vy = lerp(kinematic.lateral_velocity, dynamic_vy, blend);
    let next_yaw_rate = lerp(kinematic.yaw_rate, dynamic_yaw_rate, blend);

    state.heading += next_yaw_rate * dt;
    state.yaw_rate = next_yaw_rate;
    state.local_velocity = Vec2::new(next_vx, next_vy);
    state.velocity = body_to_world(state.local_velocity, state.heading);
    state.position += state.velocity * dt;

    state.last_ax = low_pass(state.last_ax, ax, ACCEL_FILTER_TAU, dt);
    state.last_ay = low_pass(state.last_ay, ay, ACCEL_FILTER_TAU, dt);

    state.with_derived_speed()
}
