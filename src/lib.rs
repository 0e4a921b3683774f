// Library exports for the CLI and tests
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod navigation;
pub mod planner;
pub mod services;
pub mod session;
