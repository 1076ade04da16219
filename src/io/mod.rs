//! Local file input: configuration loading

pub mod config;
