//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Select config source → Load → Env overrides → Validate
//!     → Prepare catalog → Build broker
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then catalog, then listener
//! - Fail fast: any startup error is fatal
//! - The listener is bound only after the broker exists

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownListener};
pub use startup::{build_broker, load_config, select_source, StartupError};
