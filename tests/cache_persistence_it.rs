// std
use std::{env, fs, path::PathBuf, process};
// crates.io
use httpmock::prelude::*;
use time::OffsetDateTime;
// self
use tokened_client::{
	client::{CacheHydration, TokenedClient},
	config::ClientConfig,
	error::CacheMiss,
	http::QueryParams,
	url::Url,
};

const TOKEN_BODY: &str =
	"{\"access_token\":\"persisted-token\",\"token_type\":\"bearer\",\"expires_in\":3600}";

fn build_config(server: &MockServer, path: &PathBuf) -> ClientConfig {
	ClientConfig::new(
		Url::parse(&server.base_url()).expect("Mock server URL should parse."),
		"key",
		"secret",
	)
	.with_cache_path(path)
}

fn temp_path() -> PathBuf {
	let unique = format!(
		"tokened_client_persistence_it_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	);

	env::temp_dir().join(unique)
}

#[test]
fn refresh_writes_cache_then_rehydrates() {
	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/token");
		then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
	});
	let resource_mock = server.mock(|when, then| {
		when.method(GET).path("/items").header("authorization", "Bearer persisted-token");
		then.status(200).body("{}");
	});
	let path = temp_path();
	let before = OffsetDateTime::now_utc().unix_timestamp();
	let first = TokenedClient::new(build_config(&server, &path));

	first.get("/items", &QueryParams::new()).expect("First GET should refresh and succeed.");

	token_mock.assert_calls(1);

	let raw = fs::read(&path).expect("Cache file should exist after a refresh.");
	let value: serde_json::Value =
		serde_json::from_slice(&raw).expect("Cache file should hold valid JSON.");

	assert_eq!(value["access_token"], "persisted-token");
	assert_eq!(value["expires_in"], 3600);
	// Fields beyond the token and expiry are passed through verbatim.
	assert_eq!(value["token_type"], "bearer");

	let expiration = value["expiration_time"]
		.as_f64()
		.expect("Cache file should record an absolute expiry.");

	assert!(expiration >= (before + 3_600) as f64);
	assert!(expiration <= (before + 3_660) as f64);

	// A new client against the same path hydrates and never contacts the token endpoint.
	let second = TokenedClient::new(build_config(&server, &path));

	assert!(matches!(second.hydration(), CacheHydration::Hydrated));

	second.get("/items", &QueryParams::new()).expect("Hydrated GET should succeed.");

	token_mock.assert_calls(1);
	resource_mock.assert_calls(2);

	fs::remove_file(&path).expect("Fixture cleanup should succeed.");
}

#[test]
fn corrupt_cache_degrades_to_refresh_on_first_use() {
	let server = MockServer::start();
	let token_mock = server.mock(|when, then| {
		when.method(POST).path("/token");
		then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
	});
	let resource_mock = server.mock(|when, then| {
		when.method(GET).path("/items").header("authorization", "Bearer persisted-token");
		then.status(200).body("{}");
	});
	let path = temp_path();

	fs::write(&path, b"{\"access_token\": truncated").expect("Fixture write should succeed.");

	let client = TokenedClient::new(build_config(&server, &path));

	assert!(matches!(client.hydration(), CacheHydration::Miss(CacheMiss::Malformed { .. })));

	client.get("/items", &QueryParams::new()).expect("GET after a cache miss should succeed.");

	token_mock.assert_calls(1);
	resource_mock.assert();

	// The refresh overwrote the corrupt file with a valid record.
	let raw = fs::read(&path).expect("Cache file should exist after a refresh.");
	let value: serde_json::Value =
		serde_json::from_slice(&raw).expect("Rewritten cache file should hold valid JSON.");

	assert_eq!(value["access_token"], "persisted-token");

	fs::remove_file(&path).expect("Fixture cleanup should succeed.");
}
