pub mod config;
pub mod dispatch;
pub mod error;
pub mod frames;
pub mod io;
pub mod notifier;
pub mod plans;
pub mod store;

pub use error::{ModuleError, Result};
