use crate::sim::{BrakeConfig, consts::brakes::BRAKING_TORQUE_THRESHOLD};

/// Brake torque per axle (N·m)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrakeTorques {
    pub front: f32,
    pub rear: f32,
}

impl BrakeTorques {
    pub const ZERO: Self = Self {
        front: 0.0,
        rear: 0.0,
    };

    /// Pedal torque split by the bias, plus the handbrake on the rear axle
    #[must_use]
    pub fn from_inputs(config: &BrakeConfig, brake: f32, handbrake: f32) -> Self {
        let pedal = brake * config.max_torque;
        Self {
            front: pedal * config.front_bias,
            rear: pedal * (1.0 - config.front_bias) + handbrake * config.handbrake_torque,
        }
    }

    #[must_use]
    pub fn total(&self) -> f32 {
        self.front + self.rear
    }

    #[must_use]
    pub fn is_braking(&self) -> bool {
        self.total() > BRAKING_TORQUE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CarConfig;

    #[test]
    fn bias_splits_pedal_torque() {
        let config = CarConfig::CIVILIAN.brakes;
        let torques = BrakeTorques::from_inputs(&config, 1.0, 0.0);
        assert!((torques.front - 1950.0).abs() < 1e-2);
        assert!((torques.rear - 1050.0).abs() < 1e-2);
        assert!(torques.is_braking());
    }

    #[test]
    fn handbrake_only_loads_rear() {
        let config = CarConfig::CIVILIAN.brakes;
        let torques = BrakeTorques::from_inputs(&config, 0.0, 1.0);
        assert_eq!(torques.front, 0.0);
        assert_eq!(torques.rear, config.handbrake_torque);
    }

    #[test]
    fn feathered_pedal_is_not_braking() {
        let config = CarConfig::CIVILIAN.brakes;
        assert!(!BrakeTorques::from_inputs(&config, 0.001, 0.0).is_braking());
    }
}
