//! Identity provider configuration and provider-specific behavior hooks.

pub mod config;
pub mod strategy;

pub use config::*;
pub use strategy::*;
