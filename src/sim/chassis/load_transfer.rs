use crate::sim::{
    ChassisConfig,
    consts::{GRAVITY, chassis::MIN_AXLE_LOAD},
};

/// Normal load per axle (N)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxleLoads {
    pub front: f32,
    pub rear: f32,
}

impl AxleLoads {
    #[must_use]
    pub fn total(&self) -> f32 {
        self.front + self.rear
    }
}

/// Static weight split from the CG position, shifted rearwards under
/// (filtered) forward acceleration and forwards under braking.
#[must_use]
pub fn axle_loads(chassis: &ChassisConfig, filtered_ax: f32, slope: f32) -> AxleLoads {
    let weight = chassis.mass * GRAVITY * slope.cos();
    let wheelbase = chassis.wheelbase;
    let transfer = filtered_ax * chassis.mass * chassis.cg_height / wheelbase;

    let front_static = chassis.cg_to_rear() / wheelbase * weight;
    let rear_static = chassis.cg_to_front / wheelbase * weight;

    let max_load = weight.max(MIN_AXLE_LOAD);
    AxleLoads {
        front: (front_static - transfer).clamp(MIN_AXLE_LOAD, max_load),
        rear: (rear_static + transfer).clamp(MIN_AXLE_LOAD, max_load),
    }
}

/// Weight component along the car's forward axis, negative uphill
#[must_use]
pub fn gravity_along_slope(mass: f32, slope: f32) -> f32 {
    -mass * GRAVITY * slope.sin()
}
