//! Common types shared across the Form Recognizer crates.

use std::str::FromStr;

use crate::error::FormRecognizerError;

/// Form Recognizer REST API versions supported by this SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceVersion {
    /// `v2.0`
    V2_0,
    /// `v2.1`
    #[default]
    V2_1,
}

impl ServiceVersion {
    /// The latest version supported by this SDK.
    pub fn latest() -> Self {
        Self::V2_1
    }

    /// The path segment for this version, e.g. `v2.1`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2_0 => "v2.0",
            Self::V2_1 => "v2.1",
        }
    }
}

impl std::fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceVersion {
    type Err = FormRecognizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v2.0" | "2.0" => Ok(Self::V2_0),
            "v2.1" | "2.1" => Ok(Self::V2_1),
            other => Err(FormRecognizerError::InvalidArgument(format!(
                "unsupported service version '{other}'"
            ))),
        }
    }
}
