//! Data models: configuration and the structured output document.

pub mod config;
pub mod document;
