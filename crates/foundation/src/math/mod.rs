pub mod geodesy;
pub mod local;
pub mod vec;

pub use geodesy::*;
pub use local::*;
pub use vec::*;
