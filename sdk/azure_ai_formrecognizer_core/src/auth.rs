//! Credential resolution for Form Recognizer requests.
//!
//! A client authenticates with exactly one of two mechanisms:
//!
//! - a static API key, sent as the `Ocp-Apim-Subscription-Key` header;
//! - a delegated identity ([`TokenCredential`]), exchanged for a bearer token
//!   scoped to Cognitive Services and sent as the `Authorization` header.

use crate::error::{FormRecognizerError, FormRecognizerResult};
use crate::pipeline::{HttpRequest, Policy};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Header carrying the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// OAuth scope requested for delegated identity credentials.
pub const COGNITIVE_SERVICES_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

/// Environment variable read by [`FormRecognizerCredential::from_env`].
pub const API_KEY_ENV_VAR: &str = "AZURE_FORM_RECOGNIZER_API_KEY";

/// Message returned when an empty API key is supplied.
pub const EMPTY_API_KEY_ERROR: &str = "'key' cannot be empty.";

/// Credential types supported by the Form Recognizer SDK.
#[derive(Clone)]
pub enum FormRecognizerCredential {
    /// Static API key authentication.
    ApiKey(SecretString),

    /// Delegated identity (Microsoft Entra ID) authentication.
    TokenCredential(Arc<dyn TokenCredential>),
}

/// A resolved authentication header.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    /// Header name.
    pub name: &'static str,
    /// Header value.
    pub value: String,
}

impl std::fmt::Debug for AuthorizationHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationHeader")
            .field("name", &self.name)
            .field("value", &"****")
            .finish()
    }
}

impl FormRecognizerCredential {
    /// Create an API key credential.
    ///
    /// # Errors
    ///
    /// Returns [`FormRecognizerError::InvalidArgument`] if the key is empty.
    pub fn api_key(key: impl Into<String>) -> FormRecognizerResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(FormRecognizerError::InvalidArgument(
                EMPTY_API_KEY_ERROR.into(),
            ));
        }
        Ok(Self::ApiKey(SecretString::from(key)))
    }

    /// Wrap any `azure_core` token credential.
    pub fn token_credential(credential: Arc<dyn TokenCredential>) -> Self {
        Self::TokenCredential(credential)
    }

    /// Authenticate through the locally signed-in Azure CLI account.
    pub fn azure_cli() -> FormRecognizerResult<Self> {
        let credential = azure_identity::AzureCliCredential::new(None)
            .map_err(|e| FormRecognizerError::Auth(e.to_string()))?;
        Ok(Self::TokenCredential(credential))
    }

    /// Create a credential from the `AZURE_FORM_RECOGNIZER_API_KEY` environment variable.
    /// Falls back to the Azure CLI credential if the variable is unset or empty.
    pub fn from_env() -> FormRecognizerResult<Self> {
        match std::env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.is_empty() => Self::api_key(key),
            _ => Self::azure_cli(),
        }
    }

    /// Resolve the credential to the header that authenticates a request.
    pub async fn resolve(&self) -> FormRecognizerResult<AuthorizationHeader> {
        match self {
            Self::ApiKey(key) => Ok(AuthorizationHeader {
                name: API_KEY_HEADER,
                value: key.expose_secret().to_string(),
            }),
            Self::TokenCredential(credential) => {
                let token = credential
                    .get_token(&[COGNITIVE_SERVICES_SCOPE], None)
                    .await
                    .map_err(|e| FormRecognizerError::Auth(e.to_string()))?;
                Ok(AuthorizationHeader {
                    name: AUTHORIZATION_HEADER,
                    value: format!("Bearer {}", token.token.secret()),
                })
            }
        }
    }
}

impl std::fmt::Debug for FormRecognizerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => write!(f, "FormRecognizerCredential::ApiKey(****)"),
            Self::TokenCredential(_) => write!(f, "FormRecognizerCredential::TokenCredential"),
        }
    }
}

/// Pipeline policy that signs every request with the configured credential.
#[derive(Debug, Clone)]
pub struct AuthenticationPolicy {
    credential: FormRecognizerCredential,
}

impl AuthenticationPolicy {
    pub fn new(credential: FormRecognizerCredential) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &FormRecognizerCredential {
        &self.credential
    }
}

#[async_trait]
impl Policy for AuthenticationPolicy {
    async fn on_request(&self, request: &mut HttpRequest) -> FormRecognizerResult<()> {
        let header = self.credential.resolve().await?;
        request.set_header(header.name, &header.value)
    }
}
