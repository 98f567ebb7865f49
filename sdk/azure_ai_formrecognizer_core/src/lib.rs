#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod playback;
pub mod polling;

pub use error::{ErrorKind, FormRecognizerError, FormRecognizerResult};
