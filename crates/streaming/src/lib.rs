pub mod source;
pub mod store;

pub use source::*;
pub use store::*;
