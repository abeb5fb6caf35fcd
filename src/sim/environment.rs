/// Surroundings the chassis solver needs but the car does not own
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentConfig {
    /// Road grade in radians along the car's heading, positive uphill
    pub slope: f32,
}

impl EnvironmentConfig {
    pub const FLAT: Self = Self { slope: 0.0 };

    #[must_use]
    pub const fn with_slope(slope: f32) -> Self {
        Self { slope }
    }
}
