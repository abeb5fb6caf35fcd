use crate::{math::RAD_TO_RPM, sim::consts::clutch::MIN_REFLECTED_RATIO};

/// Engine-side rpm imposed by the wheels through `total_ratio`.
///
/// Negative when the wheels turn against the selected gear.
#[must_use]
pub fn transmission_rpm(forward_speed: f32, wheel_radius: f32, total_ratio: f32) -> f32 {
    forward_speed / wheel_radius * total_ratio * RAD_TO_RPM
}

/// Engine inertia seen at the contact patch as extra vehicle mass (kg)
#[must_use]
pub fn effective_mass_target(flywheel_inertia: f32, total_ratio: f32, wheel_radius: f32) -> f32 {
    flywheel_inertia * total_ratio * total_ratio / (wheel_radius * wheel_radius)
}

/// Blends the effective mass towards its target, starting from the target on first use
#[must_use]
pub fn smooth_effective_mass(current: f32, target: f32, smoothing: f32) -> f32 {
    if current == 0.0 {
        target
    } else {
        current + (target - current) * smoothing
    }
}

/// Vehicle mass seen by the crankshaft as rotational inertia (kg·m²)
#[must_use]
pub fn reflected_inertia(mass: f32, wheel_radius: f32, total_ratio: f32) -> f32 {
    if total_ratio.abs() > MIN_REFLECTED_RATIO {
        mass * wheel_radius * wheel_radius / (total_ratio * total_ratio)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmission_rpm_matches_wheel_speed() {
        // 10 m/s on 0.3 m wheels is 318.3 wheel rpm
        let rpm = transmission_rpm(10.0, 0.3, 10.0);
        assert!((rpm - 3183.1).abs() < 0.5, "{rpm}");
        assert!(transmission_rpm(-10.0, 0.3, 10.0) < 0.0);
        assert!(transmission_rpm(-10.0, 0.3, -10.0) > 0.0);
    }

    #[test]
    fn lower_gears_reflect_less_vehicle_inertia() {
        let first = reflected_inertia(1250.0, 0.3, 14.76);
        let fifth = reflected_inertia(1250.0, 0.3, 3.28);
        assert!(first < fifth);
        assert_eq!(reflected_inertia(1250.0, 0.3, 0.0), 0.0);
    }

    #[test]
    fn effective_mass_is_filtered() {
        let target = effective_mass_target(0.25, 14.76, 0.3);
        assert_eq!(smooth_effective_mass(0.0, target, 0.2), target);

        let next = smooth_effective_mass(100.0, 200.0, 0.2);
        assert!((next - 120.0).abs() < 1e-4);
    }
}
