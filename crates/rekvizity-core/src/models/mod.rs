//! Data models for extracted company requisites and configuration.

pub mod company;
pub mod config;
