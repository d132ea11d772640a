//! Single-file token cache so a bearer token survives process restarts.
//!
//! The file holds the full token-endpoint response plus an added `expiration_time` field
//! (absolute epoch seconds). Hydration failures are soft: a missing or corrupt file degrades
//! to an empty token record, reported explicitly so callers and tests can tell the two paths
//! apart.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::Path,
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenEndpointResponse, TokenRecord},
	error::{CacheError, CacheMiss},
};

/// Shape persisted to disk: the endpoint response verbatim plus the computed absolute expiry.
#[derive(Serialize)]
struct CacheEntry<'a> {
	#[serde(flatten)]
	response: &'a TokenEndpointResponse,
	expiration_time: f64,
}

/// Fields required to rebuild a [`TokenRecord`]; anything else in the file is ignored on read.
#[derive(Deserialize)]
struct CachedToken {
	access_token: String,
	expiration_time: f64,
}

/// File-backed token cache at a fixed path.
#[derive(Clone, Debug)]
pub struct TokenCache {
	path: PathBuf,
}
impl TokenCache {
	/// Creates a cache handle; the file itself is only touched by [`load`](Self::load) and
	/// [`store`](Self::store).
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Cache file location.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Attempts to rebuild a token record from the cache file.
	///
	/// Every failure mode is a [`CacheMiss`], never a fatal error; the caller treats a miss
	/// as an empty token record.
	pub fn load(&self) -> Result<TokenRecord, CacheMiss> {
		let bytes = fs::read(&self.path).map_err(|source| {
			if source.kind() == ErrorKind::NotFound {
				CacheMiss::Absent
			} else {
				CacheMiss::Unreadable { source }
			}
		})?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let cached: CachedToken = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| CacheMiss::Malformed { source })?;

		// An absurd expiry clamps to the epoch and simply reads as stale.
		let expires_at = OffsetDateTime::UNIX_EPOCH
			.checked_add(Duration::saturating_seconds_f64(cached.expiration_time))
			.unwrap_or(OffsetDateTime::UNIX_EPOCH);

		Ok(TokenRecord { token: AccessToken::new(cached.access_token), expires_at })
	}

	/// Persists the full endpoint response plus the computed expiry, replacing any previous
	/// content. Writes to a sibling tmp file first and renames it into place.
	pub fn store(
		&self,
		response: &TokenEndpointResponse,
		expires_at: OffsetDateTime,
	) -> Result<(), CacheError> {
		let entry = CacheEntry { response, expiration_time: epoch_seconds(expires_at) };
		let serialized = serde_json::to_vec_pretty(&entry)
			.map_err(|source| CacheError::Serialize { source })?;

		self.ensure_parent_exists()?;

		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path)
				.map_err(|source| self.write_error(&tmp_path, source))?;

			file.write_all(&serialized).map_err(|source| self.write_error(&tmp_path, source))?;
			file.sync_all().map_err(|source| self.write_error(&tmp_path, source))?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|source| self.write_error(&self.path, source))
	}

	fn ensure_parent_exists(&self) -> Result<(), CacheError> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|source| self.write_error(parent, source))?;
		}

		Ok(())
	}

	fn write_error(&self, path: &Path, source: std::io::Error) -> CacheError {
		CacheError::Write { path: path.display().to_string(), source }
	}
}

/// Converts an absolute instant into fractional epoch seconds, the cache file's expiry unit.
pub(crate) fn epoch_seconds(instant: OffsetDateTime) -> f64 {
	(instant - OffsetDateTime::UNIX_EPOCH).as_seconds_f64()
}
