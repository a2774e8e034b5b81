//! Command handlers for the `melonrip` binary.

pub mod commands;
pub mod config;
pub mod export;
