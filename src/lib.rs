pub mod application;
pub mod endpoints;
pub mod migrations;
pub mod models;
pub mod schemas;
pub mod services;

#[cfg(test)]
mod test_helpers;

// Re-export from application for convenience
pub use application::bootstrapper;
pub use application::config;
pub use application::database as db;
pub use application::error;
pub use application::state;
