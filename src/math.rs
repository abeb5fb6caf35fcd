use glam::Vec2;

/// Radians per second to revolutions per minute
pub const RAD_TO_RPM: f32 = 60.0 / std::f32::consts::TAU;

/// Time constants at or below this are treated as instantaneous
pub const MIN_TAU: f32 = 0.001;

/// Like `f32::signum`, but zero maps to zero
#[must_use]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite interpolation factor, 0 below `edge0` and 1 above `edge1`
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Odd, monotonic, bounded by ±1 and linear (slope 1) around the origin.
///
/// `sharpness` controls how quickly the knee arrives; 2 gives `x / sqrt(1 + x²)`.
#[must_use]
pub fn soft_saturation(x: f32, sharpness: f32) -> f32 {
    x / (1.0 + x.abs().powf(sharpness)).powf(1.0 / sharpness)
}

/// First-order exponential approach of `current` towards `target` with time constant `tau`
#[must_use]
pub fn exp_smooth(current: f32, target: f32, tau: f32, dt: f32) -> f32 {
    if tau <= MIN_TAU {
        return target;
    }

    current + (target - current) * (1.0 - (-dt / tau).exp())
}

/// Low-pass filter used for the acceleration history
#[must_use]
pub fn low_pass(filtered: f32, raw: f32, tau: f32, dt: f32) -> f32 {
    exp_smooth(filtered, raw, tau, dt)
}

/// Steps `current` linearly towards `target` by at most `max_delta`
#[must_use]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + sign(diff) * max_delta
    }
}

/// Rotates a body-frame vector into the world frame by `heading`
#[must_use]
pub fn body_to_world(local: Vec2, heading: f32) -> Vec2 {
    Vec2::from_angle(heading).rotate(local)
}
