pub mod report;
pub mod session;
pub mod settings;

pub use report::RunReport;
pub use session::{LoadOutcome, LoadTicket, PanoramaSession};
pub use settings::{ConfigOverrides, SettingsError, resolve_config};
