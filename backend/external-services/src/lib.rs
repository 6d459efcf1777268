pub mod oauth2;
pub mod service;
pub mod session;
pub mod shared_metrics;
pub use service::*;
