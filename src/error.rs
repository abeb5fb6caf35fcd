use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("gearbox needs neutral plus 1..={max} forward gears (got {count} entries)")]
    GearCount { count: usize, max: usize },

    #[error("gear ratio {index} must be positive (got {ratio})")]
    GearRatio { index: usize, ratio: f32 },

    #[error("curve needs 1..={max} points (got {count})")]
    CurveLength { count: usize, max: usize },

    #[error("curve breakpoints must be strictly increasing (point {index})")]
    UnsortedCurve { index: usize },

    #[error("{low} ({low_value}) must be below {high} ({high_value})")]
    Ordering {
        low: &'static str,
        low_value: f32,
        high: &'static str,
        high_value: f32,
    },

    #[error("{0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "serde")]
    #[error("invalid car profile: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("not a replay stream (magic {0:?})")]
    BadMagic([u8; 4]),

    #[error("unsupported replay version {0}")]
    UnsupportedVersion(u16),

    #[error("replay tick rate {0} is outside 15..=240")]
    InvalidTickRate(u8),

    #[error("replay stream truncated")]
    Truncated,

    #[error("replay of {0} ticks does not fit the stream's tick counter")]
    TooLong(usize),

    #[error("{0}")]
    Io(io::Error),
}

impl From<io::Error> for ReplayError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(err)
        }
    }
}
