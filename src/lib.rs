pub use ahash;
pub use glam;

pub mod error;
pub mod logging;
pub mod math;
#[cfg(feature = "serde")]
pub mod presets;
pub mod replay;
pub mod sim;

pub use error::{ConfigError, ConfigResult, ReplayError};
pub use sim::{
    Advisory, CarConfig, CarPreset, EnvironmentConfig, InputState, PhysicsState,
    TelemetrySnapshot, Vehicle, update_physics,
};
