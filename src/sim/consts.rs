pub const GRAVITY: f32 = 9.81;

/// Meters per second to kilometers per hour
pub const MS_TO_KMH: f32 = 3.6;

pub const DEFAULT_TICK_RATE: u8 = 60;

pub mod input {
    /// How fast a held virtual pedal key moves the pedal (units per second)
    pub const VIRTUAL_PEDAL_RATE: f32 = 2.0;
    pub const DEFAULT_HANDBRAKE_RATCHET_RATE: f32 = 3.0;
    /// A continuous handbrake counts as pulled above this position
    pub const HANDBRAKE_PULLED_THRESHOLD: f32 = 0.1;
}

pub mod engine {
    pub const FRICTION_TORQUE_PER_KRPM: f32 = 10.0;
    pub const BRAKING_TORQUE_PER_KRPM: f32 = 15.0;
    /// Below this throttle the closed-throttle engine braking term applies
    pub const BRAKING_THROTTLE_THRESHOLD: f32 = 0.05;
    /// Friction multiplier while the rev limiter cuts fuel
    pub const REV_LIMIT_FRICTION_SCALE: f32 = 5.0;
}

pub mod clutch {
    /// Pedal positions below this count as engaged for stall and idle feed-forward
    pub const ENGAGED_PEDAL_THRESHOLD: f32 = 0.9;
    /// Below this capacity (N·m) the driveline is treated as disconnected
    pub const MIN_CAPACITY: f32 = 5.0;
    pub const LOCK_RPM_TOLERANCE: f32 = 150.0;
    /// Locking also requires rpm above this fraction of idle
    pub const LOCK_MIN_IDLE_RATIO: f32 = 0.9;
    /// Slip torque ramps linearly to full capacity across this rpm gap
    pub const SLIP_SIGN_BAND_RPM: f32 = 100.0;
    /// Reflected inertia is ignored for total ratios below this
    pub const MIN_REFLECTED_RATIO: f32 = 0.1;
}

pub mod brakes {
    /// Total brake torque (N·m) above which the car counts as braking
    pub const BRAKING_TORQUE_THRESHOLD: f32 = 10.0;
}

pub mod chassis {
    /// Normal load floor per axle (N)
    pub const MIN_AXLE_LOAD: f32 = 100.0;
    /// Forward speed floor used for slip angles (m/s)
    pub const MIN_SLIP_SPEED: f32 = 0.5;
    pub const TIRE_SATURATION_SHARPNESS: f32 = 2.0;
    /// Brake force scale per m/s while STOPPING, capped at 1
    pub const STOPPING_BRAKE_SCALE: f32 = 5.0;
    pub const ACCEL_FILTER_TAU: f32 = 0.1;
    /// STOPPING falls back to MOVING above `threshold * RESUME_SPEED_RATIO`
    pub const RESUME_SPEED_RATIO: f32 = 1.5;
    /// STOPPING settles into STOPPED below `threshold * SETTLE_SPEED_RATIO`
    pub const SETTLE_SPEED_RATIO: f32 = 0.5;
}

pub mod shift {
    /// Clutch pedal position needed before the gear lever moves
    pub const CLUTCH_THRESHOLD: f32 = 0.5;
    /// Forward speed (m/s) above which reverse is refused
    pub const REVERSE_MAX_FORWARD_SPEED: f32 = 2.0;
}
