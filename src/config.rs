//! Client configuration surface.

// self
use crate::_prelude::*;

/// Configuration for a [`TokenedClient`](crate::client::TokenedClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL all relative request paths are resolved against.
	pub base_url: Url,
	/// Credential identifier presented to the token endpoint.
	pub api_key: String,
	/// Credential secret presented to the token endpoint.
	pub api_secret: String,
	/// Minimum remaining validity required before a cached token is reused; a safety margin
	/// against the token expiring between the staleness check and its use.
	pub min_remaining_life: Duration,
	/// Optional location for persisting the token across process runs.
	pub cache_path: Option<PathBuf>,
	/// Emits the current token, its remaining lifetime, and pretty-printed response bodies to
	/// the diagnostic output. Never affects control flow.
	pub debug_mode: bool,
}
impl ClientConfig {
	const DEFAULT_MIN_REMAINING_LIFE: Duration = Duration::seconds(10);

	/// Creates a configuration with the default safety margin, no cache file, and debug
	/// output disabled.
	pub fn new(base_url: Url, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
		Self {
			base_url,
			api_key: api_key.into(),
			api_secret: api_secret.into(),
			min_remaining_life: Self::DEFAULT_MIN_REMAINING_LIFE,
			cache_path: None,
			debug_mode: false,
		}
	}

	/// Overrides the minimum remaining validity (defaults to 10 seconds).
	pub fn with_min_remaining_life(mut self, margin: Duration) -> Self {
		self.min_remaining_life = margin;

		self
	}

	/// Enables on-disk token persistence at the provided path.
	pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.cache_path = Some(path.into());

		self
	}

	/// Toggles diagnostic output.
	pub fn with_debug_mode(mut self, enabled: bool) -> Self {
		self.debug_mode = enabled;

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_documented_values() {
		let config = ClientConfig::new(
			Url::parse("https://api.example.test/v6/").expect("Base URL fixture should parse."),
			"key",
			"secret",
		);

		assert_eq!(config.min_remaining_life, Duration::seconds(10));
		assert!(config.cache_path.is_none());
		assert!(!config.debug_mode);
	}

	#[test]
	fn setters_chain() {
		let config = ClientConfig::new(
			Url::parse("https://api.example.test/").expect("Base URL fixture should parse."),
			"key",
			"secret",
		)
		.with_min_remaining_life(Duration::seconds(30))
		.with_cache_path("/tmp/token.json")
		.with_debug_mode(true);

		assert_eq!(config.min_remaining_life, Duration::seconds(30));
		assert_eq!(config.cache_path.as_deref(), Some(std::path::Path::new("/tmp/token.json")));
		assert!(config.debug_mode);
	}
}
