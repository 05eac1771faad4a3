pub mod comparison;
pub mod config;
pub mod diagnostics;
pub mod output;
pub mod portfolio;
pub mod scoring;
pub mod tui;
