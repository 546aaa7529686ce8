//! Scenario store: soft-delete repositories and services for roleplay scenarios
//!
//! (c) Softlandia 2025

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;
