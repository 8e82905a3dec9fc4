//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod action_client;
pub mod cookie_jar;
pub mod monitor_client;
pub mod state_bus;
pub mod view;

pub use action_client::ActionClient;
pub use cookie_jar::CookieJar;
pub use monitor_client::MonitorClient;
pub use state_bus::StatePublisher;
pub use view::MonitorView;
