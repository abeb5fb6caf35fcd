use glam::Vec2;

use crate::{
    math::{sign, soft_saturation},
    sim::consts::chassis::{MIN_SLIP_SPEED, TIRE_SATURATION_SHARPNESS},
};

/// Slip angle per axle (rad)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlipAngles {
    pub front: f32,
    pub rear: f32,
}

/// Slip angles of a bicycle model.
///
/// The forward speed is floored so the angles stay defined at standstill.
#[must_use]
pub fn slip_angles(
    local_velocity: Vec2,
    yaw_rate: f32,
    steer_angle: f32,
    cg_to_front: f32,
    cg_to_rear: f32,
) -> SlipAngles {
    let vx_safe = local_velocity.x.abs().max(MIN_SLIP_SPEED);
    let vy = local_velocity.y;

    SlipAngles {
        front: (vy + cg_to_front * yaw_rate).atan2(vx_safe) - steer_angle * sign(local_velocity.x),
        rear: (vy - cg_to_rear * yaw_rate).atan2(vx_safe),
    }
}

/// Cornering force opposing the slip, saturating at `friction * normal_load`
#[must_use]
pub fn lateral_force(stiffness: f32, slip_angle: f32, friction: f32, normal_load: f32) -> f32 {
    let grip = friction * normal_load;
    let normalized_slip = stiffness * slip_angle / grip;
    -soft_saturation(normalized_slip, TIRE_SATURATION_SHARPNESS) * grip
}

/// Scales a combined (longitudinal, lateral) tire force down onto the friction circle,
/// keeping its direction.
#[must_use]
pub fn friction_circle(force: Vec2, friction: f32, normal_load: f32) -> Vec2 {
    let max_force = friction * normal_load;
    let magnitude = force.length();
    if magnitude > max_force {
        force * (max_force / magnitude)
    } else {
        force
    }
}
