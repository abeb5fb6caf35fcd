mod car_config;
pub mod chassis;
pub mod consts;
mod controls;
mod environment;
pub mod input;
mod linear_piece_curve;
mod phys_state;
mod pipeline;
pub mod powertrain;
mod telemetry;
mod vehicle;

pub use car_config::*;
pub use controls::*;
pub use environment::*;
pub use linear_piece_curve::*;
pub use phys_state::*;
pub use pipeline::*;
pub use telemetry::*;
pub use vehicle::*;
