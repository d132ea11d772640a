//! Minimal bearer-token REST client—acquire an OAuth 2.0 client-credentials token, cache it in
//! memory and on disk, refresh it before expiry, and forward plain HTTP calls with it attached.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		path::PathBuf,
		str::FromStr,
	};

	pub use reqwest::blocking::Client as BlockingClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
