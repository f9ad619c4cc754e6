//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Start (http::server):
//!     Validate config → Build transport → Bind listener → Spawn accept loop
//!
//! Stop (shutdown.rs):
//!     trigger() → Stop accepting → Drain connections → Abort after deadline
//!
//! Signals (signals.rs, binary only):
//!     SIGTERM/SIGINT → Stop
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
