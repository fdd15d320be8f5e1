pub mod event_bus;
pub mod frame;
pub mod render_loop;

pub use event_bus::*;
pub use frame::*;
pub use render_loop::*;
