//! Transport primitives: the supported verb set, the blocking HTTP client wrapper, and the
//! owned response handed back to callers.

// std
use std::ops::Deref;
// crates.io
use reqwest::{StatusCode, header::HeaderMap};
// self
use crate::_prelude::*;

/// Query parameters attached to a request; ordering is irrelevant.
pub type QueryParams = BTreeMap<String, String>;
/// Form-encoded payload for POST/PUT/DELETE requests.
pub type FormBody = BTreeMap<String, String>;

/// HTTP verbs the client dispatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	/// `GET`; the request body is always ignored.
	Get,
	/// `POST`.
	Post,
	/// `PUT`.
	Put,
	/// `DELETE`.
	Delete,
}
impl Method {
	/// Canonical upper-case verb name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Delete => "DELETE",
		}
	}
}
impl FromStr for Method {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		if s.eq_ignore_ascii_case("GET") {
			Ok(Self::Get)
		} else if s.eq_ignore_ascii_case("POST") {
			Ok(Self::Post)
		} else if s.eq_ignore_ascii_case("PUT") {
			Ok(Self::Put)
		} else if s.eq_ignore_ascii_case("DELETE") {
			Ok(Self::Delete)
		} else {
			Err(Error::InvalidMethod { method: s.into() })
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Thin wrapper around the blocking [`BlockingClient`] so shared HTTP behavior lives in one
/// place. Any custom client (proxies, custom TLS roots, timeouts) can be injected through
/// [`with_client`](Self::with_client); the wrapper is what the client dispatches every token
/// and resource request through.
#[derive(Clone, Debug, Default)]
pub struct RestTransport(pub BlockingClient);
impl RestTransport {
	/// Wraps an existing blocking reqwest client.
	pub fn with_client(client: BlockingClient) -> Self {
		Self(client)
	}
}
impl AsRef<BlockingClient> for RestTransport {
	fn as_ref(&self) -> &BlockingClient {
		&self.0
	}
}
impl Deref for RestTransport {
	type Target = BlockingClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Owned HTTP response: status, headers, and the full body, with no interpretation of
/// success or failure applied.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl ApiResponse {
	pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
		Self { status, headers, body }
	}

	/// HTTP status code.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Raw response body bytes.
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Body decoded lossily as UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Body decoded as JSON into the requested type.
	pub fn json<T>(&self) -> Result<T, serde_json::Error>
	where
		T: serde::de::DeserializeOwned,
	{
		serde_json::from_slice(&self.body)
	}
}
