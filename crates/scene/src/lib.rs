pub mod components;
pub mod object;
pub mod prefabs;
pub mod render;
pub mod scene;

pub use object::*;
pub use scene::*;
