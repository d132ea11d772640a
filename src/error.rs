//! Client-level error types shared across token refresh, caching, and dispatch.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token acquisition failed; fatal for the in-flight request, never retried internally.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Token cache could not be written after a successful refresh.
	#[error(transparent)]
	Cache(#[from] CacheError),
	/// Unsupported HTTP verb requested; a programming error on the caller's side.
	#[error("Invalid HTTP request method `{method}`.")]
	InvalidMethod {
		/// Verb string as supplied by the caller.
		method: String,
	},
	/// Request path could not be resolved against the configured base URL.
	#[error("Failed to resolve request URL for `{path}`.")]
	RequestUrl {
		/// Path as supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Transport failure while dispatching a request; propagated unmodified.
	#[error(transparent)]
	Transport(#[from] reqwest::Error),
}

/// Failures raised while exchanging client credentials for a bearer token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint could not be reached.
	#[error("Token endpoint could not be reached.")]
	Unreachable {
		/// Transport-specific network error.
		#[source]
		source: reqwest::Error,
	},
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}: {body}.")]
	Endpoint {
		/// HTTP status code of the response.
		status: u16,
		/// Response body, lossily decoded for diagnostics.
		body: String,
	},
	/// Token endpoint responded with JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Failures raised while persisting the token cache file.
#[derive(Debug, ThisError)]
pub enum CacheError {
	/// Cache entry could not be serialized to JSON.
	#[error("Failed to serialize the token cache entry.")]
	Serialize {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Cache file could not be created, written, or replaced.
	#[error("Failed to write the token cache at {path}.")]
	Write {
		/// Cache file location.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}

/// Soft failures while hydrating the token cache; reported through
/// [`CacheHydration`](crate::client::CacheHydration), never through [`Error`].
#[derive(Debug, ThisError)]
pub enum CacheMiss {
	/// Cache file does not exist.
	#[error("Token cache file does not exist.")]
	Absent,
	/// Cache file exists but could not be read.
	#[error("Token cache file could not be read.")]
	Unreadable {
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Cache file exists but does not contain a well-formed token record.
	#[error("Token cache file contains malformed JSON.")]
	Malformed {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
