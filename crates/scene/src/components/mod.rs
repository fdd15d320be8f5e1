pub mod geometry;
pub mod material;
pub mod overlay_tag;
pub mod transform;

pub use geometry::*;
pub use material::*;
pub use overlay_tag::*;
pub use transform::*;
