use crate::sim::{
    ClutchState,
    consts::clutch::{LOCK_MIN_IDLE_RATIO, LOCK_RPM_TOLERANCE, MIN_CAPACITY, SLIP_SIGN_BAND_RPM},
};

/// Torque (N·m) the clutch can hold at the given pedal position
#[must_use]
pub fn clutch_capacity(pedal: f32, max_torque: f32) -> f32 {
    ((1.0 - pedal) * max_torque).max(0.0)
}

/// Everything the lock state machine looks at for one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClutchConditions {
    pub gear: i8,
    pub engine_torque: f32,
    pub capacity: f32,
    pub rpm: f32,
    /// Engine-side speed the wheels would impose through the gearbox
    pub transmission_rpm: f32,
    pub idle_rpm: f32,
    /// Relative band around the capacity
    pub hysteresis: f32,
    /// A locked clutch lets go below `idle_rpm * anti_stall_idle_ratio`
    pub anti_stall_idle_ratio: f32,
}

impl ClutchState {
    /// Advances the lock state machine by one tick
    #[must_use]
    pub fn next(self, c: &ClutchConditions) -> Self {
        if c.gear == 0 || c.capacity < MIN_CAPACITY {
            return Self::Disengaged;
        }

        let torque = c.engine_torque.abs();
        match self {
            Self::Locked => {
                let overloaded = torque > c.capacity * (1.0 + c.hysteresis);
                let lugging = c.rpm < c.idle_rpm * c.anti_stall_idle_ratio;
                if overloaded || lugging {
                    Self::Slipping
                } else {
                    Self::Locked
                }
            }
            Self::Slipping | Self::Disengaged => {
                let holds = torque < c.capacity * (1.0 - c.hysteresis);
                let synced = (c.rpm - c.transmission_rpm).abs() < LOCK_RPM_TOLERANCE;
                let healthy = c.rpm > c.idle_rpm * LOCK_MIN_IDLE_RATIO;
                if holds && synced && healthy {
                    Self::Locked
                } else {
                    Self::Slipping
                }
            }
        }
    }
}

/// Torque passed through a slipping clutch, in the direction of the rpm gap.
///
/// Full capacity outside a narrow band around zero gap, linear inside it, so a
/// dead engine and a stationary car do not trade the full capacity back and forth.
#[must_use]
pub fn slip_torque(capacity: f32, rpm_gap: f32) -> f32 {
    capacity * (rpm_gap / SLIP_SIGN_BAND_RPM).clamp(-1.0, 1.0)
}
