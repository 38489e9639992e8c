use thiserror::Error;

/// Result type for request authentication
pub type HyperAuthResult<T> = std::result::Result<T, HyperAuthError>;

/// Error type for request authentication for hyper
#[derive(Error, Debug)]
pub enum HyperAuthError {
  /// The request body could not be read to the end. The request must not be dispatched.
  #[error("Http body error: {0}")]
  HttpBodyError(String),

  /// The signed path does not form a valid request target
  #[error("Invalid signed path: {0}")]
  InvalidUri(#[from] http::uri::InvalidUri),

  /// The signed path could not be reassembled into a uri
  #[error("Invalid uri parts: {0}")]
  InvalidUriParts(#[from] http::uri::InvalidUriParts),

  /// Failed to parse header value
  #[error("Failed to parse header value: {0}")]
  InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}
