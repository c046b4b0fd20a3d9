//! Infrastructure layer - Provider adapters, storage and services

pub mod blob;
pub mod extractor;
pub mod logging;
pub mod provider;
pub mod services;
