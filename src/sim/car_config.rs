use super::{LinearPieceCurve, consts};
use crate::error::{ConfigError, ConfigResult};

/// Most forward gears a gearbox can have
pub const MAX_FORWARD_GEARS: usize = 7;

/// Ratios indexed by gear number, index 0 being neutral
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f32>", into = "Vec<f32>"))]
pub struct GearRatios {
    ratios: [f32; MAX_FORWARD_GEARS + 1],
    len: usize,
}

impl GearRatios {
    /// `ratios[0]` is the neutral slot and is forced to zero
    #[must_use]
    pub const fn new(ratios: &[f32]) -> Self {
        let n = ratios.len();
        assert!(n >= 2 && n <= MAX_FORWARD_GEARS + 1);

        let mut result = [0.0; MAX_FORWARD_GEARS + 1];
        let mut i = 1;
        while i < n {
            result[i] = ratios[i];
            i += 1;
        }

        Self { ratios: result, len: n }
    }

    pub fn try_new(ratios: &[f32]) -> ConfigResult<Self> {
        if ratios.len() < 2 || ratios.len() > MAX_FORWARD_GEARS + 1 {
            return Err(ConfigError::GearCount {
                count: ratios.len(),
                max: MAX_FORWARD_GEARS,
            });
        }

        for (index, &ratio) in ratios.iter().enumerate().skip(1) {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(ConfigError::GearRatio { index, ratio });
            }
        }

        Ok(Self::new(ratios))
    }

    /// Highest selectable forward gear
    #[must_use]
    pub const fn max_gear(&self) -> i8 {
        (self.len - 1) as i8
    }

    /// Ratio for a forward gear, zero for neutral or anything out of range
    #[must_use]
    pub fn get(&self, gear: i8) -> f32 {
        usize::try_from(gear)
            .ok()
            .filter(|&i| i < self.len)
            .map_or(0.0, |i| self.ratios[i])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.ratios[..self.len]
    }
}

impl TryFrom<Vec<f32>> for GearRatios {
    type Error = ConfigError;

    fn try_from(ratios: Vec<f32>) -> ConfigResult<Self> {
        Self::try_new(&ratios)
    }
}

impl From<GearRatios> for Vec<f32> {
    fn from(ratios: GearRatios) -> Self {
        ratios.as_slice().to_vec()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdleControllerConfig {
    /// Throttle per rpm of error below idle
    pub kp: f32,
    /// Throttle per accumulated rpm·s of error
    pub ki: f32,
    /// Anti-windup clamp for the accumulated error (rpm·s)
    pub integral_limit: f32,
    /// Base throttle held at idle
    pub feed_forward: f32,
    /// Extra throttle per unit of clutch engagement while in gear
    pub clutch_load_feed_forward: f32,
    pub max_output: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub idle_rpm: f32,
    /// The engine dies when dragged below this while the clutch is engaged in gear
    pub stall_rpm: f32,
    pub redline_rpm: f32,
    /// Fuel is cut above this
    pub max_rpm: f32,
    /// Torque at full throttle on the plateau of the curve (N·m)
    pub peak_torque: f32,
    /// RPM to fraction of `peak_torque`
    pub torque_curve: LinearPieceCurve,
    /// Rotational inertia of the crank and flywheel (kg·m²)
    pub flywheel_inertia: f32,
    pub friction_coefficient: f32,
    pub engine_braking_coefficient: f32,
    /// Drag torque of a dead engine (N·m), should exceed the clutch capacity
    pub off_drag_torque: f32,
    pub idle: IdleControllerConfig,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionConfig {
    pub gear_ratios: GearRatios,
    /// Magnitude of the reverse gear ratio
    pub reverse_ratio: f32,
    pub final_drive: f32,
    /// Torque the fully engaged clutch can hold (N·m)
    pub clutch_max_torque: f32,
    /// Relative band around the capacity in which the lock state is kept
    pub clutch_hysteresis: f32,
    /// Per-tick blend factor of the effective driveline mass towards its target
    pub effective_mass_smoothing: f32,
    /// A locked clutch lets go when rpm falls below this fraction of idle
    pub anti_stall_idle_ratio: f32,
}

impl TransmissionConfig {
    /// Gear ratio times final drive, negative in reverse and zero in neutral
    #[must_use]
    pub fn total_ratio(&self, gear: i8) -> f32 {
        match gear {
            0 => 0.0,
            g if g < 0 => -self.reverse_ratio * self.final_drive,
            g => self.gear_ratios.get(g) * self.final_drive,
        }
    }

    #[must_use]
    pub const fn max_gear(&self) -> i8 {
        self.gear_ratios.max_gear()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChassisConfig {
    pub mass: f32,
    pub wheelbase: f32,
    /// Distance from the center of gravity to the front axle
    pub cg_to_front: f32,
    pub cg_height: f32,
    /// Yaw moment of inertia (kg·m²)
    pub yaw_inertia: f32,
    /// Cornering stiffness per axle (N/rad)
    pub cornering_stiffness_front: f32,
    pub cornering_stiffness_rear: f32,
    pub tire_friction: f32,
    pub wheel_radius: f32,
    /// Aerodynamic drag, force = coefficient · v²
    pub drag_coefficient: f32,
    /// Rolling resistance as a fraction of weight
    pub rolling_resistance: f32,
    /// Steering wheel degrees per road wheel degree
    pub steering_ratio: f32,
    /// Steering wheel lock in degrees, each way
    pub max_steering_wheel_angle: f32,
}

impl ChassisConfig {
    #[must_use]
    pub fn cg_to_rear(&self) -> f32 {
        self.wheelbase - self.cg_to_front
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrakeConfig {
    /// Total torque of both axles at full pedal (N·m)
    pub max_torque: f32,
    /// Share of pedal brake torque going to the front axle
    pub front_bias: f32,
    /// Rear torque at full handbrake (N·m)
    pub handbrake_torque: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandbrakeMode {
    /// Follows the handbrake input like a pedal
    Continuous,
    /// A toggle latches the lever, which then travels at `rate` per second
    Ratchet { rate: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlsConfig {
    pub throttle_tau: f32,
    pub brake_tau: f32,
    pub clutch_tau: f32,
    /// Falls back to `brake_tau`
    pub handbrake_tau: Option<f32>,
    pub handbrake_mode: HandbrakeMode,
    /// Forward speed (m/s) to steering time constant while steering
    pub steering_curve: LinearPieceCurve,
    pub steering_return_tau: f32,
}

impl ControlsConfig {
    #[must_use]
    pub fn handbrake_tau(&self) -> f32 {
        self.handbrake_tau.unwrap_or(self.brake_tau)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeelConfig {
    /// Forward speed (m/s) under which braking starts the stop sequence
    pub stop_speed_threshold: f32,
    /// Seconds spent STOPPING before the car may settle into STOPPED
    pub min_stop_time: f32,
    /// Below this forward speed the chassis is fully kinematic
    pub low_speed_blend_start: f32,
    /// Above this forward speed the chassis is fully dynamic
    pub low_speed_blend_end: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarConfig {
    pub engine: EngineConfig,
    pub transmission: TransmissionConfig,
    pub chassis: ChassisConfig,
    pub brakes: BrakeConfig,
    pub controls: ControlsConfig,
    pub feel: FeelConfig,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self::CIVILIAN
    }
}

const DEFAULT_IDLE_CONTROLLER: IdleControllerConfig = IdleControllerConfig {
    kp: 0.01,
    ki: 0.15,
    integral_limit: 0.5,
    feed_forward: 0.15,
    clutch_load_feed_forward: 0.6,
    max_output: 0.8,
};

const DEFAULT_FEEL: FeelConfig = FeelConfig {
    stop_speed_threshold: 0.1,
    min_stop_time: 0.1,
    low_speed_blend_start: 1.0,
    low_speed_blend_end: 3.0,
};

impl CarConfig {
    /// Front-heavy hatchback, the training car
    pub const CIVILIAN: Self = Self {
        engine: EngineConfig {
            idle_rpm: 750.0,
            stall_rpm: 300.0,
            redline_rpm: 6500.0,
            max_rpm: 6800.0,
            peak_torque: 180.0,
            torque_curve: LinearPieceCurve::new(&[
                (0.0, 0.6),
                (1000.0, 0.8),
                (6000.0, 1.0),
                (7000.0, 0.0),
            ]),
            flywheel_inertia: 0.25,
            friction_coefficient: 1.0,
            engine_braking_coefficient: 1.0,
            off_drag_torque: 600.0,
            idle: DEFAULT_IDLE_CONTROLLER,
        },
        transmission: TransmissionConfig {
            gear_ratios: GearRatios::new(&[0.0, 3.6, 2.1, 1.4, 1.0, 0.8]),
            reverse_ratio: 3.3,
            final_drive: 4.1,
            clutch_max_torque: 270.0,
            clutch_hysteresis: 0.1,
            effective_mass_smoothing: 0.2,
            anti_stall_idle_ratio: 0.6,
        },
        chassis: ChassisConfig {
            mass: 1250.0,
            wheelbase: 2.65,
            cg_to_front: 1.06,
            cg_height: 0.55,
            yaw_inertia: 2000.0,
            cornering_stiffness_front: 80_000.0,
            cornering_stiffness_rear: 90_000.0,
            tire_friction: 1.2,
            wheel_radius: 0.3,
            drag_coefficient: 0.4,
            rolling_resistance: 0.015,
            steering_ratio: 16.0,
            max_steering_wheel_angle: 540.0,
        },
        brakes: BrakeConfig {
            max_torque: 3000.0,
            front_bias: 0.65,
            handbrake_torque: 1500.0,
        },
        controls: ControlsConfig {
            throttle_tau: 0.08,
            brake_tau: 0.08,
            clutch_tau: 0.06,
            handbrake_tau: None,
            handbrake_mode: HandbrakeMode::Continuous,
            steering_curve: LinearPieceCurve::new(&[(0.0, 0.5), (10.0, 0.6), (30.0, 0.8)]),
            steering_return_tau: 0.3,
        },
        feel: DEFAULT_FEEL,
    };

    /// Light, high-revving coupe with quick steering
    pub const SPORT: Self = Self {
        engine: EngineConfig {
            idle_rpm: 850.0,
            stall_rpm: 350.0,
            redline_rpm: 7200.0,
            max_rpm: 7500.0,
            peak_torque: 350.0,
            torque_curve: LinearPieceCurve::new(&[
                (0.0, 0.6),
                (1000.0, 0.8),
                (6700.0, 1.0),
                (7700.0, 0.0),
            ]),
            flywheel_inertia: 0.15,
            friction_coefficient: 1.2,
            engine_braking_coefficient: 1.5,
            off_drag_torque: 900.0,
            idle: IdleControllerConfig {
                kp: 0.004,
                ..DEFAULT_IDLE_CONTROLLER
            },
        },
        transmission: TransmissionConfig {
            gear_ratios: GearRatios::new(&[0.0, 3.2, 2.0, 1.5, 1.1, 0.9]),
            reverse_ratio: 3.1,
            final_drive: 3.9,
            clutch_max_torque: 500.0,
            clutch_hysteresis: 0.1,
            effective_mass_smoothing: 0.2,
            anti_stall_idle_ratio: 0.6,
        },
        chassis: ChassisConfig {
            mass: 1350.0,
            wheelbase: 2.55,
            cg_to_front: 1.05,
            cg_height: 0.5,
            yaw_inertia: 2200.0,
            cornering_stiffness_front: 95_000.0,
            cornering_stiffness_rear: 105_000.0,
            tire_friction: 1.4,
            wheel_radius: 0.32,
            drag_coefficient: 0.35,
            rolling_resistance: 0.013,
            steering_ratio: 12.0,
            max_steering_wheel_angle: 360.0,
        },
        brakes: BrakeConfig {
            max_torque: 3600.0,
            front_bias: 0.62,
            handbrake_torque: 1800.0,
        },
        controls: ControlsConfig {
            throttle_tau: 0.08,
            brake_tau: 0.08,
            clutch_tau: 0.06,
            handbrake_tau: Some(0.05),
            handbrake_mode: HandbrakeMode::Continuous,
            steering_curve: LinearPieceCurve::new(&[(0.0, 0.35), (10.0, 0.45), (30.0, 0.6)]),
            steering_return_tau: 0.3,
        },
        feel: DEFAULT_FEEL,
    };

    /// Heavy, slow-revving box truck with a ratchet parking brake
    pub const TRUCK: Self = Self {
        engine: EngineConfig {
            idle_rpm: 600.0,
            stall_rpm: 250.0,
            redline_rpm: 3500.0,
            max_rpm: 4000.0,
            peak_torque: 600.0,
            torque_curve: LinearPieceCurve::new(&[
                (0.0, 0.6),
                (1000.0, 0.8),
                (3000.0, 1.0),
                (4000.0, 0.0),
            ]),
            flywheel_inertia: 1.2,
            friction_coefficient: 0.8,
            engine_braking_coefficient: 2.5,
            off_drag_torque: 1500.0,
            idle: DEFAULT_IDLE_CONTROLLER,
        },
        transmission: TransmissionConfig {
            gear_ratios: GearRatios::new(&[0.0, 5.0, 3.0, 2.0, 1.5, 1.0]),
            reverse_ratio: 4.5,
            final_drive: 5.0,
            clutch_max_torque: 900.0,
            clutch_hysteresis: 0.1,
            effective_mass_smoothing: 0.2,
            anti_stall_idle_ratio: 0.6,
        },
        chassis: ChassisConfig {
            mass: 4500.0,
            wheelbase: 3.8,
            cg_to_front: 1.7,
            cg_height: 0.9,
            yaw_inertia: 9000.0,
            cornering_stiffness_front: 200_000.0,
            cornering_stiffness_rear: 260_000.0,
            tire_friction: 1.0,
            wheel_radius: 0.45,
            drag_coefficient: 0.8,
            rolling_resistance: 0.015,
            steering_ratio: 24.0,
            max_steering_wheel_angle: 900.0,
        },
        brakes: BrakeConfig {
            max_torque: 12_000.0,
            front_bias: 0.6,
            handbrake_torque: 5000.0,
        },
        controls: ControlsConfig {
            throttle_tau: 0.08,
            brake_tau: 0.08,
            clutch_tau: 0.06,
            handbrake_tau: None,
            handbrake_mode: HandbrakeMode::Ratchet {
                rate: consts::input::DEFAULT_HANDBRAKE_RATCHET_RATE,
            },
            steering_curve: LinearPieceCurve::new(&[(0.0, 0.9), (10.0, 1.0), (30.0, 1.2)]),
            steering_return_tau: 0.5,
        },
        feel: DEFAULT_FEEL,
    };

    /// Checks every physical quantity and relationship the solvers rely on
    pub fn validate(&self) -> ConfigResult<()> {
        let engine = &self.engine;
        positive("engine.idle_rpm", engine.idle_rpm)?;
        positive("engine.stall_rpm", engine.stall_rpm)?;
        positive("engine.peak_torque", engine.peak_torque)?;
        positive("engine.flywheel_inertia", engine.flywheel_inertia)?;
        non_negative("engine.friction_coefficient", engine.friction_coefficient)?;
        non_negative(
            "engine.engine_braking_coefficient",
            engine.engine_braking_coefficient,
        )?;
        non_negative("engine.off_drag_torque", engine.off_drag_torque)?;
        ordered("engine.stall_rpm", engine.stall_rpm, "engine.idle_rpm", engine.idle_rpm)?;
        ordered("engine.idle_rpm", engine.idle_rpm, "engine.redline_rpm", engine.redline_rpm)?;
        if engine.redline_rpm > engine.max_rpm {
            return Err(ConfigError::Ordering {
                low: "engine.redline_rpm",
                low_value: engine.redline_rpm,
                high: "engine.max_rpm",
                high_value: engine.max_rpm,
            });
        }
        check_curve(&engine.torque_curve)?;
        non_negative("engine.idle.integral_limit", engine.idle.integral_limit)?;
        in_range("engine.idle.max_output", engine.idle.max_output, 0.0, 1.0)?;

        let trans = &self.transmission;
        check_gears(&trans.gear_ratios)?;
        positive("transmission.reverse_ratio", trans.reverse_ratio)?;
        positive("transmission.final_drive", trans.final_drive)?;
        positive("transmission.clutch_max_torque", trans.clutch_max_torque)?;
        in_range("transmission.clutch_hysteresis", trans.clutch_hysteresis, 0.0, 0.99)?;
        in_range(
            "transmission.effective_mass_smoothing",
            trans.effective_mass_smoothing,
            0.0,
            1.0,
        )?;
        in_range(
            "transmission.anti_stall_idle_ratio",
            trans.anti_stall_idle_ratio,
            0.0,
            1.0,
        )?;

        let chassis = &self.chassis;
        positive("chassis.mass", chassis.mass)?;
        positive("chassis.wheelbase", chassis.wheelbase)?;
        positive("chassis.cg_to_front", chassis.cg_to_front)?;
        ordered(
            "chassis.cg_to_front",
            chassis.cg_to_front,
            "chassis.wheelbase",
            chassis.wheelbase,
        )?;
        non_negative("chassis.cg_height", chassis.cg_height)?;
        positive("chassis.yaw_inertia", chassis.yaw_inertia)?;
        positive(
            "chassis.cornering_stiffness_front",
            chassis.cornering_stiffness_front,
        )?;
        positive(
            "chassis.cornering_stiffness_rear",
            chassis.cornering_stiffness_rear,
        )?;
        positive("chassis.tire_friction", chassis.tire_friction)?;
        positive("chassis.wheel_radius", chassis.wheel_radius)?;
        non_negative("chassis.drag_coefficient", chassis.drag_coefficient)?;
        non_negative("chassis.rolling_resistance", chassis.rolling_resistance)?;
        positive("chassis.steering_ratio", chassis.steering_ratio)?;
        positive(
            "chassis.max_steering_wheel_angle",
            chassis.max_steering_wheel_angle,
        )?;

        non_negative("brakes.max_torque", self.brakes.max_torque)?;
        in_range("brakes.front_bias", self.brakes.front_bias, 0.0, 1.0)?;
        non_negative("brakes.handbrake_torque", self.brakes.handbrake_torque)?;

        let controls = &self.controls;
        non_negative("controls.throttle_tau", controls.throttle_tau)?;
        non_negative("controls.brake_tau", controls.brake_tau)?;
        non_negative("controls.clutch_tau", controls.clutch_tau)?;
        non_negative("controls.handbrake_tau", controls.handbrake_tau())?;
        non_negative("controls.steering_return_tau", controls.steering_return_tau)?;
        if let HandbrakeMode::Ratchet { rate } = controls.handbrake_mode {
            positive("controls.handbrake_mode.rate", rate)?;
        }
        check_curve(&controls.steering_curve)?;

        let feel = &self.feel;
        positive("feel.stop_speed_threshold", feel.stop_speed_threshold)?;
        non_negative("feel.min_stop_time", feel.min_stop_time)?;
        non_negative("feel.low_speed_blend_start", feel.low_speed_blend_start)?;
        ordered(
            "feel.low_speed_blend_start",
            feel.low_speed_blend_start,
            "feel.low_speed_blend_end",
            feel.low_speed_blend_end,
        )?;

        Ok(())
    }

    /// Parses and validates a per-vehicle JSON profile
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> ConfigResult<()> {
    in_range(field, value, 0.0, f32::MAX)
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> ConfigResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn ordered(
    low: &'static str,
    low_value: f32,
    high: &'static str,
    high_value: f32,
) -> ConfigResult<()> {
    if low_value < high_value {
        Ok(())
    } else {
        Err(ConfigError::Ordering {
            low,
            low_value,
            high,
            high_value,
        })
    }
}

/// Re-runs the checks of [`LinearPieceCurve::try_new`] on an already built curve
fn check_curve(curve: &LinearPieceCurve) -> ConfigResult<()> {
    let points: Vec<(f32, f32)> = curve.points().collect();
    LinearPieceCurve::try_new(&points).map(|_| ())
}

fn check_gears(gears: &GearRatios) -> ConfigResult<()> {
    GearRatios::try_new(gears.as_slice()).map(|_| ())
}

/// The built-in vehicle profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarPreset {
    Civilian,
    Sport,
    Truck,
}

impl CarPreset {
    pub const ALL: [Self; 3] = [Self::Civilian, Self::Sport, Self::Truck];
    const NAMES: [&'static str; 3] = ["civilian", "sport", "truck"];

    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub const fn config(self) -> CarConfig {
        match self {
            Self::Civilian => CarConfig::CIVILIAN,
            Self::Sport => CarConfig::SPORT,
            Self::Truck => CarConfig::TRUCK,
        }
    }
}
