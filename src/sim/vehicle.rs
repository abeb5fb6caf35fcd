use std::fmt::Display;

use arrayvec::ArrayVec;

use super::{
    CarConfig, EnvironmentConfig, InputState, PhysicsState, TelemetrySnapshot, Triggers,
    ZoneFlags,
    consts::{
        DEFAULT_TICK_RATE,
        shift::{CLUTCH_THRESHOLD, REVERSE_MAX_FORWARD_SPEED},
    },
    update_physics,
};

/// Messages for the driver raised while handling one-shot triggers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Advisory {
    EngineStarted,
    EngineStopped,
    Shifted { from: i8, to: i8 },
    Reset,
    /// A shift was requested without the clutch pressed far enough
    ClutchNotPressed,
    /// Reverse was requested while still rolling forwards
    ReverseBlocked,
}

impl Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::EngineStarted => f.write_str("engine started"),
            Self::EngineStopped => f.write_str("engine stopped"),
            Self::Shifted { from, to } => f.write_fmt(format_args!("shifted {from} -> {to}")),
            Self::Reset => f.write_str("reset"),
            Self::ClutchNotPressed => f.write_str("press the clutch to shift"),
            Self::ReverseBlocked => f.write_str("stop before selecting reverse"),
        }
    }
}

/// At most one advisory per trigger kind
pub type Advisories = ArrayVec<Advisory, 4>;

/// Tick driver for a single car.
///
/// Owns the state between ticks, applies the one-shot triggers and then runs
/// the pure pipeline with a fixed `dt`.
#[derive(Clone, Debug)]
pub struct Vehicle {
    config: CarConfig,
    env: EnvironmentConfig,
    tick_time: f32,
    tick_count: u64,
    zones: ZoneFlags,
    initial_state: PhysicsState,
    pub state: PhysicsState,
}

impl Vehicle {
    #[must_use]
    pub fn new(config: CarConfig, env: EnvironmentConfig, initial_state: PhysicsState) -> Self {
        Self::with_tick_rate(config, env, initial_state, DEFAULT_TICK_RATE)
    }

    pub fn with_tick_rate(
        config: CarConfig,
        env: EnvironmentConfig,
        initial_state: PhysicsState,
        tick_rate: u8,
    ) -> Self {
        assert!(tick_rate >= 15, "tick_rate must be at least 15");
        assert!(tick_rate <= 240, "tick_rate must not be greater than 240");

        Self {
            config,
            env,
            tick_time: 1. / f32::from(tick_rate),
            tick_count: 0,
            zones: ZoneFlags::default(),
            initial_state,
            state: initial_state,
        }
    }

    /// Handles the triggers of `input`, then advances the simulation by one tick
    pub fn step(&mut self, input: &InputState) -> Advisories {
        let advisories = self.apply_triggers(input.triggers);
        self.state = update_physics(
            self.state,
            &self.config,
            &self.env,
            &input.clamp(),
            self.tick_time,
        );
        self.tick_count += 1;

        advisories
    }

    fn apply_triggers(&mut self, triggers: Triggers) -> Advisories {
        let mut advisories = Advisories::new();

        if triggers.reset {
            log::info!("resetting vehicle after {} ticks", self.tick_count);
            self.state = self.initial_state;
            advisories.push(Advisory::Reset);
        }

        if triggers.toggle_engine {
            advisories.push(self.toggle_engine());
        }

        if triggers.shift_up {
            advisories.extend(self.shift(1));
        }

        if triggers.shift_down {
            advisories.extend(self.shift(-1));
        }

        advisories
    }

    fn toggle_engine(&mut self) -> Advisory {
        let state = &mut self.state;
        if state.engine_on {
            log::info!("engine stopped at {:.0} rpm", state.rpm);
            state.engine_on = false;
            Advisory::EngineStopped
        } else {
            log::info!("engine started in gear {}", state.gear);
            state.engine_on = true;
            state.stalled = false;
            state.rpm = self.config.engine.idle_rpm;
            state.idle_integral = 0.0;
            Advisory::EngineStarted
        }
    }

    /// Moves one gear in `direction`, or returns why it couldn't
    fn shift(&mut self, direction: i8) -> Option<Advisory> {
        let state = &mut self.state;
        if state.clutch <= CLUTCH_THRESHOLD {
            log::debug!("shift rejected, clutch at {:.2}", state.clutch);
            return Some(Advisory::ClutchNotPressed);
        }

        let from = state.gear;
        let to = (from + direction).clamp(-1, self.config.transmission.max_gear());
        if to == from {
            return None;
        }

        if to < 0 && state.forward_speed() > REVERSE_MAX_FORWARD_SPEED {
            log::debug!(
                "reverse rejected at {:.1} m/s forward",
                state.forward_speed()
            );
            return Some(Advisory::ReverseBlocked);
        }

        state.gear = to;
        Some(Advisory::Shifted { from, to })
    }

    /// Applies the consequence of hitting an obstacle, as detected by the caller
    pub fn collide(&mut self) {
        log::info!("collision at {:.1} km/h", self.state.speed_kmh);
        self.state = self.state.apply_collision();
    }

    /// Restores the state the vehicle was created with
    pub fn reset(&mut self) {
        self.state = self.initial_state;
    }

    #[must_use]
    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::new(&self.state, self.tick_count, self.tick_rate(), self.zones)
    }

    /// Stores the zone flags reported by the external collision system for the telemetry
    pub fn set_zones(&mut self, zones: ZoneFlags) {
        self.zones = zones;
    }

    /// Swaps the whole car config, taking effect on the next tick
    pub fn set_config(&mut self, config: CarConfig) {
        self.config = config;
    }

    pub fn set_environment(&mut self, env: EnvironmentConfig) {
        self.env = env;
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &CarConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn environment(&self) -> &EnvironmentConfig {
        &self.env
    }

    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[inline]
    #[must_use]
    pub fn tick_rate(&self) -> f32 {
        1. / self.tick_time
    }

    #[inline]
    #[must_use]
    pub const fn tick_time(&self) -> f32 {
        self.tick_time
    }
}
