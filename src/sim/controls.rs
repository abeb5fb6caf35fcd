/// Key state for one virtual pedal, used by digital-only control schemes
/// that step a pedal up and down instead of holding it fully pressed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PedalNudge {
    pub increase: bool,
    pub decrease: bool,
    /// Snap straight to a fully pressed pedal
    pub set_full: bool,
    /// Snap straight to a released pedal
    pub set_zero: bool,
}

impl PedalNudge {
    pub const NONE: Self = Self {
        increase: false,
        decrease: false,
        set_full: false,
        set_zero: false,
    };
}

/// Virtual steering counterpart of [`PedalNudge`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteerNudge {
    pub left: bool,
    pub right: bool,
    pub full_left: bool,
    pub full_right: bool,
}

impl SteerNudge {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        full_left: false,
        full_right: false,
    };
}

/// One-shot requests, each acted upon at most once per tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triggers {
    pub toggle_engine: bool,
    pub shift_up: bool,
    pub shift_down: bool,
    pub reset: bool,
    /// Only meaningful for a ratchet handbrake
    pub toggle_handbrake: bool,
}

impl Triggers {
    pub const NONE: Self = Self {
        toggle_engine: false,
        shift_up: false,
        shift_down: false,
        reset: false,
        toggle_handbrake: false,
    };

    #[must_use]
    pub const fn any(&self) -> bool {
        self.toggle_engine || self.shift_up || self.shift_down || self.reset || self.toggle_handbrake
    }
}

/// Raw controls for one tick, as produced by a keyboard or controller adapter.
///
/// Analog values take precedence over the digital keys of the same control.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputState {
    pub throttle: bool,
    pub brake: bool,
    /// Clutch pedal pressed (disengaged)
    pub clutch: bool,
    pub handbrake: bool,
    pub left: bool,
    pub right: bool,
    /// 0 to 1
    pub throttle_analog: Option<f32>,
    /// 0 to 1
    pub brake_analog: Option<f32>,
    /// 0 (released, engaged) to 1 (pressed, disengaged)
    pub clutch_analog: Option<f32>,
    /// 0 to 1
    pub handbrake_analog: Option<f32>,
    /// -1 (full left) to 1 (full right)
    pub steering_analog: Option<f32>,
    pub virtual_throttle: PedalNudge,
    pub virtual_brake: PedalNudge,
    pub virtual_clutch: PedalNudge,
    pub virtual_steering: SteerNudge,
    pub triggers: Triggers,
}

impl Default for InputState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl InputState {
    pub const DEFAULT: Self = Self {
        throttle: false,
        brake: false,
        clutch: false,
        handbrake: false,
        left: false,
        right: false,
        throttle_analog: None,
        brake_analog: None,
        clutch_analog: None,
        handbrake_analog: None,
        steering_analog: None,
        virtual_throttle: PedalNudge::NONE,
        virtual_brake: PedalNudge::NONE,
        virtual_clutch: PedalNudge::NONE,
        virtual_steering: SteerNudge::NONE,
        triggers: Triggers::NONE,
    };

    /// Clamps analog values into their valid ranges, mapping NaN to "not supplied"
    #[must_use]
    pub fn clamp(mut self) -> Self {
        fn unit(value: Option<f32>, min: f32) -> Option<f32> {
            value.filter(|v| !v.is_nan()).map(|v| v.clamp(min, 1.0))
        }

        self.throttle_analog = unit(self.throttle_analog, 0.0);
        self.brake_analog = unit(self.brake_analog, 0.0);
        self.clutch_analog = unit(self.clutch_analog, 0.0);
        self.handbrake_analog = unit(self.handbrake_analog, 0.0);
        self.steering_analog = unit(self.steering_analog, -1.0);
        self
    }

    /// The same controls with every one-shot trigger cleared
    #[must_use]
    pub const fn without_triggers(mut self) -> Self {
        self.triggers = Triggers::NONE;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_analog_values() {
        let input = InputState {
            throttle_analog: Some(1.7),
            brake_analog: Some(-0.2),
            clutch_analog: Some(f32::NAN),
            steering_analog: Some(-3.0),
            ..InputState::DEFAULT
        }
        .clamp();

        assert_eq!(input.throttle_analog, Some(1.0));
        assert_eq!(input.brake_analog, Some(0.0));
        assert_eq!(input.clutch_analog, None);
        assert_eq!(input.steering_analog, Some(-1.0));
        assert_eq!(input.handbrake_analog, None);
    }

    #[test]
    fn without_triggers_keeps_held_keys() {
        let input = InputState {
            throttle: true,
            triggers: Triggers {
                shift_up: true,
                ..Triggers::NONE
            },
            ..InputState::DEFAULT
        };

        let cleared = input.without_triggers();
        assert!(cleared.throttle);
        assert!(!cleared.triggers.any());
    }
}
