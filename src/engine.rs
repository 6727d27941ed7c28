pub mod body;
pub mod config;
pub mod fixed_math;
pub mod spatial_hash;
pub mod world;

pub use body::{Body, BodyHandle};
pub use config::{load_initial_config, InitialConfig, SimConfig};
pub use fixed_math::{FixedNum, FixedVec2};
pub use world::{Impact, Removal, RemovalCause, World, WorldError};
