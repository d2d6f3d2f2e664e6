//! Command-line interface for the inspection certificate SDK

pub mod commands;
pub mod error;
pub mod logging;
