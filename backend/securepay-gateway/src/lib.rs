pub mod app;
pub mod configs;
pub mod error;
pub mod logger;

/// Name this service logs under
#[macro_export]
macro_rules! service_name {
    () => {
        env!("CARGO_CRATE_NAME")
    };
}
