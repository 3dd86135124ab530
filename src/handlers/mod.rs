//! Handler implementations

pub mod console;
pub mod http;
pub mod rotating_file;
pub mod rotation;
pub mod timed_file;

pub use console::ConsoleHandler;
pub use http::HttpHandler;
pub use rotating_file::RotatingFileHandler;
pub use rotation::RotationPolicy;
pub use timed_file::TimedRotatingFileHandler;

// Re-export the trait for convenience
pub use crate::core::Handler;
