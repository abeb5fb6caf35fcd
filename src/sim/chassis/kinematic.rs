use crate::{math::smoothstep, sim::FeelConfig};

/// Lateral velocity and yaw rate of a car rolling without tire slip
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KinematicMotion {
    pub lateral_velocity: f32,
    pub yaw_rate: f32,
}

/// Kinematic bicycle model, referenced at the CG
#[must_use]
pub fn kinematic_motion(
    forward_speed: f32,
    steer_angle: f32,
    cg_to_rear: f32,
    wheelbase: f32,
) -> KinematicMotion {
    let steer_tan = steer_angle.tan();
    let slip = (cg_to_rear / wheelbase * steer_tan).atan();

    KinematicMotion {
        lateral_velocity: forward_speed * slip.tan(),
        yaw_rate: forward_speed * slip.cos() * steer_tan / wheelbase,
    }
}

/// Weight of the dynamic model; 0 is fully kinematic, 1 fully dynamic
#[must_use]
pub fn dynamic_blend(feel: &FeelConfig, forward_speed: f32) -> f32 {
    smoothstep(
        feel.low_speed_blend_start,
        feel.low_speed_blend_end,
        forward_speed.abs(),
    )
}
