use crate::sim::{
    EngineConfig,
    consts::{clutch::ENGAGED_PEDAL_THRESHOLD, engine},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdleAssist {
    /// Throttle the controller asks for
    pub throttle: f32,
    pub integral: f32,
}

/// PI controller holding the engine at idle, with feed-forward for the load
/// an engaged clutch puts on it while in gear.
#[must_use]
pub fn idle_assist(
    config: &EngineConfig,
    rpm: f32,
    integral: f32,
    gear: i8,
    clutch: f32,
    dt: f32,
) -> IdleAssist {
    let idle = &config.idle;
    let error = config.idle_rpm - rpm;
    let integral = (integral + error * dt).clamp(-idle.integral_limit, idle.integral_limit);

    let mut feed_forward = idle.feed_forward;
    if gear != 0 && clutch < ENGAGED_PEDAL_THRESHOLD {
        feed_forward += (1.0 - clutch) * idle.clutch_load_feed_forward;
    }

    let throttle =
        (feed_forward + error * idle.kp + integral * idle.ki).clamp(0.0, idle.max_output);

    IdleAssist { throttle, integral }
}

/// Internal friction torque at `rpm`, always positive
#[must_use]
pub fn friction_torque(config: &EngineConfig, rpm: f32) -> f32 {
    rpm / 1000.0 * engine::FRICTION_TORQUE_PER_KRPM * config.friction_coefficient
}

/// Net crank torque (N·m) for the given speed and throttle
#[must_use]
pub fn engine_torque(
    config: &EngineConfig,
    rpm: f32,
    throttle: f32,
    engine_on: bool,
    stalled: bool,
) -> f32 {
    if !engine_on || stalled {
        return -config.off_drag_torque;
    }

    let friction = friction_torque(config, rpm);
    if rpm > config.max_rpm {
        // fuel cut
        return -friction * engine::REV_LIMIT_FRICTION_SCALE;
    }

    let combustion = config.peak_torque * throttle * config.torque_curve.get_output(rpm);
    let mut torque = combustion - friction;

    if throttle < engine::BRAKING_THROTTLE_THRESHOLD {
        torque -= rpm / 1000.0 * engine::BRAKING_TORQUE_PER_KRPM * config.engine_braking_coefficient;
    }

    torque
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::CarConfig;

    const ENGINE: EngineConfig = CarConfig::CIVILIAN.engine;

    #[test]
    fn closed_throttle_brakes_moderately() {
        let coast = engine_torque(&ENGINE, 3000.0, 0.0, true, false);
        assert!(coast < -20.0 && coast > -80.0, "coast torque {coast}");
    }

    #[test]
    fn full_throttle_delivers() {
        let power = engine_torque(&ENGINE, 3000.0, 1.0, true, false);
        assert!(power > 100.0, "power torque {power}");
    }

    #[test]
    fn limiter_cuts_fuel() {
        let over = engine_torque(&ENGINE, ENGINE.max_rpm + 10.0, 1.0, true, false);
        assert!(over < 0.0);
    }

    #[test]
    fn dead_engine_drags() {
        assert_eq!(engine_torque(&ENGINE, 2000.0, 1.0, false, false), -ENGINE.off_drag_torque);
        assert_eq!(engine_torque(&ENGINE, 2000.0, 1.0, true, true), -ENGINE.off_drag_torque);
    }

    #[test]
    fn idle_assist_pushes_towards_idle() {
        let low = idle_assist(&ENGINE, 500.0, 0.0, 0, 1.0, 1.0 / 60.0);
        let high = idle_assist(&ENGINE, 1500.0, 0.0, 0, 1.0, 1.0 / 60.0);
        assert!(low.throttle > high.throttle);
        assert_eq!(high.throttle, 0.0);
        assert!(low.throttle <= ENGINE.idle.max_output);
    }

    #[test]
    fn idle_integral_is_clamped() {
        let mut integral = 0.0;
        for _ in 0..10_000 {
            integral = idle_assist(&ENGINE, 0.0, integral, 0, 1.0, 1.0 / 60.0).integral;
        }
        assert_eq!(integral, ENGINE.idle.integral_limit);
    }

    #[test]
    fn engaged_clutch_adds_feed_forward() {
        let free = idle_assist(&ENGINE, 750.0, 0.0, 1, 1.0, 1.0 / 60.0);
        let loaded = idle_assist(&ENGINE, 750.0, 0.0, 1, 0.0, 1.0 / 60.0);
        let neutral = idle_assist(&ENGINE, 750.0, 0.0, 0, 0.0, 1.0 / 60.0);
        assert!(loaded.throttle > free.throttle);
        assert_eq!(neutral.throttle, free.throttle);
    }
}
