pub mod auth;
pub mod guides;
pub mod health;
pub mod metrics;
pub mod preferences;
pub mod swagger;
pub mod users;
