//! Bearer-token record, staleness predicate, and token-endpoint payload types.

// self
use crate::_prelude::*;

/// Redacted bearer-token wrapper keeping the secret out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a freshly minted token value.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token value for header construction. Callers must avoid logging it
	/// outside the explicit debug-mode path.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// In-memory bearer token plus the absolute instant after which it must not be used.
#[derive(Clone, Debug)]
pub struct TokenRecord {
	/// Bearer token attached to outgoing requests.
	pub token: AccessToken,
	/// Expiry instant promised by the issuer.
	pub expires_at: OffsetDateTime,
}
impl TokenRecord {
	/// Remaining validity at the provided instant; negative once expired.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		self.expires_at - now
	}

	/// Returns `true` when fewer than `min_remaining` seconds of validity are left.
	///
	/// Pure wall-clock predicate; the record never transitions explicitly, it merely reads as
	/// stale once enough time has passed.
	pub fn is_stale_at(&self, now: OffsetDateTime, min_remaining: Duration) -> bool {
		self.remaining_at(now) < min_remaining
	}
}

/// Successful token-endpoint payload.
///
/// Fields beyond `access_token` and `expires_in` are collected untyped so the cache file can
/// reproduce the full response.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenEndpointResponse {
	/// Bearer token issued by the endpoint.
	pub access_token: String,
	/// Relative lifetime in seconds; its absence is an error decided by the caller.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expires_in: Option<u64>,
	/// Remaining response fields, passed through verbatim.
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}
impl Debug for TokenEndpointResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenEndpointResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("extra", &self.extra)
			.finish()
	}
}
