use std::fmt::Display;

use glam::Vec2;

use super::consts::MS_TO_KMH;

/// Lock state of the clutch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClutchState {
    /// Neutral, or too little capacity to transmit anything
    #[default]
    Disengaged,
    /// Transmitting torque up to its capacity while the two sides turn at different speeds
    Slipping,
    /// Engine speed is tied to wheel speed
    Locked,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StoppingState {
    #[default]
    Moving,
    /// Slow and braking, waiting out the dwell time
    Stopping,
    /// Held still by the brakes, velocity is exactly zero
    Stopped,
}

/// Accumulated positions of the virtual pedals
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualPedals {
    pub throttle: f32,
    pub brake: f32,
    pub clutch: f32,
    /// -1 to 1
    pub steering: f32,
}

impl VirtualPedals {
    pub const ZERO: Self = Self {
        throttle: 0.0,
        brake: 0.0,
        clutch: 0.0,
        steering: 0.0,
    };
}

/// Full simulation state of one vehicle.
///
/// World frame: `x` east, `y` south, heading measured clockwise from `+x`.
/// Body frame: `x` forward, `y` to the right.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicsState {
    pub position: Vec2,
    /// Radians
    pub heading: f32,
    /// World frame velocity (m/s)
    pub velocity: Vec2,
    /// Body frame velocity (m/s)
    pub local_velocity: Vec2,
    /// Rad/s
    pub yaw_rate: f32,

    pub throttle: f32,
    pub brake: f32,
    /// 0 is fully engaged (pedal released), 1 is fully disengaged
    pub clutch: f32,
    pub handbrake: f32,
    /// Latched lever of a ratchet handbrake, or the continuous handbrake being past its threshold
    pub handbrake_pulled: bool,
    /// Degrees, positive to the right
    pub steering_wheel_angle: f32,
    /// Road wheel angle in radians
    pub steer_angle: f32,
    pub virtual_pedals: VirtualPedals,

    pub rpm: f32,
    /// 0 is neutral, -1 is reverse
    pub gear: i8,
    pub clutch_state: ClutchState,
    /// Accumulated idle rpm error (rpm·s)
    pub idle_integral: f32,
    /// Smoothed engine inertia seen at the wheels as extra mass (kg)
    pub effective_mass: f32,

    pub engine_on: bool,
    pub stalled: bool,

    /// Filtered body frame accelerations, feeding the next load transfer
    pub last_ax: f32,
    pub last_ay: f32,
    pub stopping_state: StoppingState,
    /// Seconds spent in the current stop sequence
    pub stop_timer: f32,
    pub speed_kmh: f32,
}

impl Default for PhysicsState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl PhysicsState {
    pub const DEFAULT: Self = Self {
        position: Vec2::ZERO,
        heading: 0.0,
        velocity: Vec2::ZERO,
        local_velocity: Vec2::ZERO,
        yaw_rate: 0.0,
        throttle: 0.0,
        brake: 0.0,
        clutch: 0.0,
        handbrake: 0.0,
        handbrake_pulled: false,
        steering_wheel_angle: 0.0,
        steer_angle: 0.0,
        virtual_pedals: VirtualPedals::ZERO,
        rpm: 0.0,
        gear: 0,
        clutch_state: ClutchState::Disengaged,
        idle_integral: 0.0,
        effective_mass: 0.0,
        engine_on: false,
        stalled: false,
        last_ax: 0.0,
        last_ay: 0.0,
        stopping_state: StoppingState::Moving,
        stop_timer: 0.0,
        speed_kmh: 0.0,
    };

    /// A parked car with the engine off at the given start pose
    #[must_use]
    pub const fn spawn(position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            ..Self::DEFAULT
        }
    }

    #[must_use]
    pub const fn is_clutch_locked(&self) -> bool {
        matches!(self.clutch_state, ClutchState::Locked)
    }

    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        matches!(self.stopping_state, StoppingState::Stopped)
    }

    /// Signed body frame longitudinal speed (m/s)
    #[must_use]
    pub const fn forward_speed(&self) -> f32 {
        self.local_velocity.x
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Recomputes the km/h readout from the world velocity
    #[must_use]
    pub fn with_derived_speed(mut self) -> Self {
        self.speed_kmh = self.speed() * MS_TO_KMH;
        self
    }

    /// Consequence of hitting an obstacle, as reported by an external collision system:
    /// the car bounces back at half speed and the engine dies.
    #[must_use]
    pub fn apply_collision(mut self) -> Self {
        self.velocity *= -0.5;
        self.local_velocity *= -0.5;
        self.yaw_rate = 0.0;
        self.stopping_state = StoppingState::Moving;
        self.stop_timer = 0.0;
        self.engine_on = false;
        self.stalled = true;
        self.with_derived_speed()
    }
}

impl Display for PhysicsState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("PhysicsState {")?;
        f.write_fmt(format_args!("\n\tposition: {}", self.position))?;
        f.write_fmt(format_args!("\n\theading: {}", self.heading))?;
        f.write_fmt(format_args!("\n\tlocal_velocity: {}", self.local_velocity))?;
        f.write_fmt(format_args!("\n\tyaw_rate: {}", self.yaw_rate))?;
        f.write_fmt(format_args!(
            "\n\tpedals: throttle {:.2}, brake {:.2}, clutch {:.2}, handbrake {:.2}",
            self.throttle, self.brake, self.clutch, self.handbrake
        ))?;
        f.write_fmt(format_args!("\n\tsteering_wheel_angle: {}", self.steering_wheel_angle))?;
        f.write_fmt(format_args!(
            "\n\tengine: {:.0} rpm, gear {}, {:?}, on {}, stalled {}",
            self.rpm, self.gear, self.clutch_state, self.engine_on, self.stalled
        ))?;
        f.write_fmt(format_args!("\n\tstopping_state: {:?}", self.stopping_state))?;
        f.write_str("}")
    }
}
