//! Infrastructure services

mod inference_service;

pub use inference_service::{
    InferenceConfig, InferenceOutcome, InferenceProviders, InferenceService,
};
