use crate::sim::{
    FeelConfig, StoppingState,
    consts::chassis::{RESUME_SPEED_RATIO, SETTLE_SPEED_RATIO},
};

/// Inputs of the stop detection for one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StopConditions {
    /// Signed body frame forward speed (m/s)
    pub forward_speed: f32,
    pub braking: bool,
    /// Largest force the brakes can resist with (N)
    pub holding_force: f32,
    /// Drive force plus gravity along the slope (N)
    pub net_propulsion: f32,
}

impl StoppingState {
    /// Advances stop detection, returning the new state and its dwell timer
    #[must_use]
    pub fn next(self, timer: f32, c: &StopConditions, feel: &FeelConfig, dt: f32) -> (Self, f32) {
        let speed = c.forward_speed.abs();
        let threshold = feel.stop_speed_threshold;

        match self {
            Self::Moving => {
                if speed < threshold && c.braking {
                    (Self::Stopping, 0.0)
                } else {
                    (Self::Moving, 0.0)
                }
            }
            Self::Stopping => {
                let timer = timer + dt;
                // a slope can balance the faded brakes above the settle speed
                let held = speed < threshold && c.holding_force > c.net_propulsion.abs();
                let settled = speed < threshold * SETTLE_SPEED_RATIO || held;
                if settled && timer > feel.min_stop_time {
                    (Self::Stopped, timer)
                } else if speed > threshold * RESUME_SPEED_RATIO || !c.braking {
                    (Self::Moving, 0.0)
                } else {
                    (Self::Stopping, timer)
                }
            }
            Self::Stopped => {
                if c.holding_force > c.net_propulsion.abs() {
                    (Self::Stopped, timer)
                } else {
                    (Self::Moving, 0.0)
                }
            }
        }
    }
}
