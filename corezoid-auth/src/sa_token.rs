use base64::{engine::general_purpose, Engine as _};
use std::sync::OnceLock;

/// Bearer prefix of the authorization header value
const BEARER_PREFIX: &str = "Bearer ";

/* -------------------------------- */
/// Static service-account token sent as `Authorization: Bearer <base64(token)>`.
/// The encoded form is computed on first use and cached for the lifetime of the instance.
#[derive(Clone)]
pub struct SaTokenAuth {
  token: String,
  encoded: OnceLock<String>,
}

impl std::fmt::Debug for SaTokenAuth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SaTokenAuth")
      .field("token", &"<redacted>")
      .field("encoded", &self.encoded.get().is_some())
      .finish()
  }
}

impl SaTokenAuth {
  /// Create a new bearer token credential from the raw token
  pub fn new(token: impl Into<String>) -> Self {
    Self {
      token: token.into(),
      encoded: OnceLock::new(),
    }
  }

  /// Standard base64 (padded) encoding of the raw token, computed once
  pub fn encoded_token(&self) -> &str {
    self
      .encoded
      .get_or_init(|| general_purpose::STANDARD.encode(self.token.as_bytes()))
  }

  /// Value of the `Authorization` header
  pub fn authorization_value(&self) -> String {
    format!("{BEARER_PREFIX}{}", self.encoded_token())
  }
}
