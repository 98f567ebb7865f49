#![doc = include_str!("../README.md")]

pub mod blocking;
pub mod builder;
pub mod models;
pub mod recognizer;
pub mod service_models;
pub mod training;
pub mod transforms;
pub mod validation;

pub use blocking::{FormRecognizerClient, FormTrainingClient, SyncPoller};
pub use builder::FormRecognizerClientBuilder;
pub use recognizer::FormRecognizerAsyncClient;
pub use training::FormTrainingAsyncClient;
