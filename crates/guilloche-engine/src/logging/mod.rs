//! Logger setup.
//!
//! One call early in `main`; everything else goes through the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
