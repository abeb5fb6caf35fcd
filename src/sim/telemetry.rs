use std::fmt::Display;

use glam::Vec2;

use super::PhysicsState;

/// Facts about the car's surroundings reported back by the external collision system
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneFlags {
    pub is_colliding: bool,
    pub is_in_target_zone: bool,
}

/// Read-only view of one tick for dashboards, HUDs and lesson objectives
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetrySnapshot {
    pub tick_count: u64,
    /// Seconds since the start of the run
    pub elapsed: f32,
    pub speed_kmh: f32,
    pub rpm: f32,
    pub gear: i8,
    pub throttle: f32,
    pub brake: f32,
    pub clutch: f32,
    pub handbrake: f32,
    /// Degrees, positive right
    pub steering_wheel_angle: f32,
    pub stalled: bool,
    pub engine_on: bool,
    pub position: Vec2,
    pub heading: f32,
    pub zones: ZoneFlags,
}

impl TelemetrySnapshot {
    #[must_use]
    pub fn new(state: &PhysicsState, tick_count: u64, tick_rate: f32, zones: ZoneFlags) -> Self {
        Self {
            tick_count,
            elapsed: tick_count as f32 / tick_rate,
            speed_kmh: state.speed_kmh,
            rpm: state.rpm,
            gear: state.gear,
            throttle: state.throttle,
            brake: state.brake,
            clutch: state.clutch,
            handbrake: state.handbrake,
            steering_wheel_angle: state.steering_wheel_angle,
            stalled: state.stalled,
            engine_on: state.engine_on,
            position: state.position,
            heading: state.heading,
            zones,
        }
    }

    /// Gear as shown on a dashboard: `R`, `N` or the gear number
    #[must_use]
    pub fn gear_label(&self) -> String {
        match self.gear {
            0 => "N".to_string(),
            g if g < 0 => "R".to_string(),
            g => g.to_string(),
        }
    }
}

impl Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "[{:>6}] {:>5.1} km/h {:>5.0} rpm gear {}",
            self.tick_count,
            self.speed_kmh,
            self.rpm,
            self.gear_label()
        ))?;

        if self.stalled {
            f.write_str(" STALLED")?;
        } else if !self.engine_on {
            f.write_str(" OFF")?;
        }

        Ok(())
    }
}
