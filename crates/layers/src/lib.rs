pub mod config;
pub mod overlay;
pub mod proximity;
pub mod shape;
pub mod symbology;

pub use config::{ConfigError, OverlayConfig};
pub use overlay::*;
