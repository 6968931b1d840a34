//! Data models: the parsed invoice record and pipeline configuration.

pub mod config;
pub mod invoice;
