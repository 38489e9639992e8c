use crate::{api_key::ApiKeyAuth, sa_token::SaTokenAuth};

/// Authentication strategy of a client, chosen once at construction
#[derive(Debug, Clone)]
pub enum Auth {
  /// keyed signature appended to the url path
  ApiKey(ApiKeyAuth),
  /// static bearer token in the authorization header
  SaToken(SaTokenAuth),
}

impl Auth {
  /// Short name of the strategy, safe to log
  pub fn kind(&self) -> &'static str {
    match self {
      Auth::ApiKey(_) => "api-key",
      Auth::SaToken(_) => "sa-token",
    }
  }
}

impl std::fmt::Display for Auth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Auth::ApiKey(auth) => write!(f, "{} (login {})", self.kind(), auth.login()),
      Auth::SaToken(_) => write!(f, "{}", self.kind()),
    }
  }
}

impl From<ApiKeyAuth> for Auth {
  fn from(value: ApiKeyAuth) -> Self {
    Auth::ApiKey(value)
  }
}

impl From<SaTokenAuth> for Auth {
  fn from(value: SaTokenAuth) -> Self {
    Auth::SaToken(value)
  }
}
