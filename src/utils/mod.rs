//! Utility modules
//!
//! Provides logging setup and single instance enforcement.

pub mod logging;
pub mod single_instance;

pub use logging::init_logging;
pub use single_instance::SingleInstanceGuard;
