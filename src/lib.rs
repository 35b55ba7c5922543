pub mod config;
pub mod error;
pub mod journal;
pub mod metrics;
pub mod models;
pub mod session;
pub mod store;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
