//! Client construction, the token-refresh policy, and request dispatch.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use parking_lot::Mutex;
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenEndpointResponse, TokenRecord},
	cache::TokenCache,
	config::ClientConfig,
	error::{AuthError, CacheMiss},
	http::{ApiResponse, FormBody, Method, QueryParams, RestTransport},
};

/// Outcome of the cache hydration attempted at construction.
///
/// A miss is soft: the client starts with an empty token record and refreshes on first use.
/// Exposed so callers and tests can assert which path ran.
#[derive(Debug)]
pub enum CacheHydration {
	/// No cache path was configured.
	Disabled,
	/// The cache file produced a token record.
	Hydrated,
	/// The cache file was missing, unreadable, or malformed.
	Miss(CacheMiss),
}

/// REST client that owns a bearer-token record and refreshes it before every request that
/// would otherwise go out with fewer than `min_remaining_life` seconds of validity left.
#[derive(Debug)]
pub struct TokenedClient {
	config: ClientConfig,
	transport: RestTransport,
	cache: Option<TokenCache>,
	token: Mutex<Option<TokenRecord>>,
	hydration: CacheHydration,
}
impl TokenedClient {
	/// Builds a client over a default blocking transport.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_transport(config, RestTransport::default())
	}

	/// Builds a client over a caller-supplied transport, hydrating the token record from the
	/// configured cache file when possible.
	pub fn with_transport(config: ClientConfig, transport: RestTransport) -> Self {
		let cache = config.cache_path.clone().map(TokenCache::new);
		let (token, hydration) = match &cache {
			None => (None, CacheHydration::Disabled),
			Some(cache) => match cache.load() {
				Ok(record) => (Some(record), CacheHydration::Hydrated),
				Err(miss) => {
					tracing::debug!(path = %cache.path().display(), %miss, "token cache miss");

					(None, CacheHydration::Miss(miss))
				},
			},
		};

		Self { config, transport, cache, token: Mutex::new(token), hydration }
	}

	/// Configuration this client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// How the token record was seeded at construction.
	pub fn hydration(&self) -> &CacheHydration {
		&self.hydration
	}

	/// Dispatches `method` against `path` with a fresh bearer token attached.
	///
	/// `path` is either an absolute `http(s)` URL or a segment resolved against the base URL.
	/// The body is ignored for GET. The response is returned as-is; interpreting its status is
	/// the caller's responsibility.
	pub fn request(
		&self,
		method: Method,
		path: &str,
		params: &QueryParams,
		body: &FormBody,
	) -> Result<ApiResponse> {
		let token = self.ensure_fresh_token()?;
		let url = resolve_url(&self.config.base_url, path)?;
		let builder = match method {
			Method::Get => self.transport.get(url),
			Method::Post => self.transport.post(url).form(body),
			Method::Put => self.transport.put(url).form(body),
			Method::Delete => self.transport.delete(url).form(body),
		};
		let response = builder
			.header(AUTHORIZATION, format!("Bearer {}", token.expose()))
			.query(params)
			.send()?;
		let status = response.status();
		let headers = response.headers().clone();
		let bytes = response.bytes()?.to_vec();
		let response = ApiResponse::new(status, headers, bytes);

		if self.config.debug_mode {
			log_response_body(&response);
		}

		Ok(response)
	}

	/// `GET` convenience wrapper; GET requests carry no body.
	pub fn get(&self, path: &str, params: &QueryParams) -> Result<ApiResponse> {
		self.request(Method::Get, path, params, &FormBody::new())
	}

	/// `POST` convenience wrapper.
	pub fn post(&self, path: &str, params: &QueryParams, body: &FormBody) -> Result<ApiResponse> {
		self.request(Method::Post, path, params, body)
	}

	/// `PUT` convenience wrapper.
	pub fn put(&self, path: &str, params: &QueryParams, body: &FormBody) -> Result<ApiResponse> {
		self.request(Method::Put, path, params, body)
	}

	/// `DELETE` convenience wrapper.
	pub fn delete(
		&self,
		path: &str,
		params: &QueryParams,
		body: &FormBody,
	) -> Result<ApiResponse> {
		self.request(Method::Delete, path, params, body)
	}

	/// Reuses the cached token when at least `min_remaining_life` of validity remains,
	/// otherwise refreshes it in place. Holding the lock across the refresh serializes
	/// concurrent callers onto a single exchange.
	fn ensure_fresh_token(&self) -> Result<AccessToken> {
		let mut guard = self.token.lock();
		let now = OffsetDateTime::now_utc();
		let record = match &mut *guard {
			Some(record) if !record.is_stale_at(now, self.config.min_remaining_life) => record,
			slot => slot.insert(self.refresh_token(now)?),
		};

		if self.config.debug_mode {
			tracing::debug!(
				token = record.token.expose(),
				remaining_secs = record.remaining_at(now).whole_seconds(),
				"bearer token state"
			);
		}

		Ok(record.token.clone())
	}

	/// Exchanges the configured credentials for a new bearer token and persists it.
	fn refresh_token(&self, now: OffsetDateTime) -> Result<TokenRecord> {
		let url = resolve_url(&self.config.base_url, "token")?;
		let credentials =
			BASE64.encode(format!("{}:{}", self.config.api_key, self.config.api_secret));
		let response = self
			.transport
			.post(url)
			.header(AUTHORIZATION, format!("Basic {credentials}"))
			.form(&[("grant_type", "client_credentials")])
			.send()
			.map_err(|source| AuthError::Unreachable { source })?;
		let status = response.status();
		let bytes = response.bytes().map_err(|source| AuthError::Unreachable { source })?;

		if !status.is_success() {
			return Err(AuthError::Endpoint {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&bytes).into_owned(),
			}
			.into());
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let payload: TokenEndpointResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| AuthError::MalformedResponse { source })?;
		// No silent default lifetime: an endpoint that omits expires_in is malformed.
		let expires_in = payload.expires_in.ok_or(AuthError::MissingExpiresIn)?;
		let expires_in = i64::try_from(expires_in).map_err(|_| AuthError::ExpiresInOutOfRange)?;
		let expires_at = now
			.checked_add(Duration::seconds(expires_in))
			.ok_or(AuthError::ExpiresInOutOfRange)?;
		let record =
			TokenRecord { token: AccessToken::new(payload.access_token.clone()), expires_at };

		if let Some(cache) = &self.cache {
			cache.store(&payload, record.expires_at)?;
		}

		tracing::debug!(expires_at = %record.expires_at, "refreshed bearer token");

		Ok(record)
	}
}

/// Resolves a request path: absolute URLs pass through, anything else is joined to the base
/// URL with exactly one `/` boundary.
fn resolve_url(base: &Url, path: &str) -> Result<Url> {
	let raw = if path.starts_with("https://") || path.starts_with("http://") {
		path.to_owned()
	} else {
		format!("{}/{}", base.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
	};

	Url::parse(&raw).map_err(|source| Error::RequestUrl { path: path.into(), source })
}

fn log_response_body(response: &ApiResponse) {
	match response.json::<serde_json::Value>() {
		Ok(decoded) =>
			if let Ok(pretty) = serde_json::to_string_pretty(&decoded) {
				tracing::debug!(body = %pretty, "response body");
			},
		Err(_) => tracing::debug!("empty or non-JSON response body"),
	}
}
