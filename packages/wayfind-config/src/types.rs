use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000/api/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub backend: Backend,
	#[serde(default)]
	pub suggest: Suggest,
	#[serde(default)]
	pub routes: Routes,
	#[serde(default)]
	pub context: Context,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
	/// Optional in the file. `WAYFIND_BACKEND_URL` overrides it, and the local default applies
	/// when neither is set.
	pub api_base: Option<String>,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Suggest {
	#[serde(default = "default_debounce_ms")]
	pub debounce_ms: u64,
	#[serde(default = "default_suggest_limit")]
	pub limit: u32,
	#[serde(default = "default_recent_limit")]
	pub recent_limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Routes {
	#[serde(default = "default_home_route")]
	pub home: String,
	#[serde(default = "default_search_route")]
	pub search: String,
	#[serde(default = "default_disambiguate_route")]
	pub disambiguate: String,
	#[serde(default = "default_go_route")]
	pub go: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
	/// First path segments that introduce a city slug in the second segment, e.g.
	/// `/property-rates/pune`.
	#[serde(default = "default_sections")]
	pub sections: Vec<String>,
	/// First path segments that never name a city.
	#[serde(default = "default_reserved")]
	pub reserved: Vec<String>,
	/// City slug to city id.
	#[serde(default = "default_cities")]
	pub cities: HashMap<String, String>,
}

impl Backend {
	pub fn api_base(&self) -> &str {
		self.api_base.as_deref().unwrap_or(DEFAULT_BACKEND_URL)
	}
}

impl Default for Backend {
	fn default() -> Self {
		Self { api_base: None, timeout_ms: default_timeout_ms(), default_headers: Map::new() }
	}
}

impl Default for Suggest {
	fn default() -> Self {
		Self {
			debounce_ms: default_debounce_ms(),
			limit: default_suggest_limit(),
			recent_limit: default_recent_limit(),
		}
	}
}

impl Default for Routes {
	fn default() -> Self {
		Self {
			home: default_home_route(),
			search: default_search_route(),
			disambiguate: default_disambiguate_route(),
			go: default_go_route(),
		}
	}
}

impl Default for Context {
	fn default() -> Self {
		Self { sections: default_sections(), reserved: default_reserved(), cities: default_cities() }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_timeout_ms() -> u64 {
	4_000
}

fn default_debounce_ms() -> u64 {
	180
}

fn default_suggest_limit() -> u32 {
	10
}

fn default_recent_limit() -> u32 {
	8
}

fn default_home_route() -> String {
	"/".to_string()
}

fn default_search_route() -> String {
	"/search".to_string()
}

fn default_disambiguate_route() -> String {
	"/disambiguate".to_string()
}

fn default_go_route() -> String {
	"/go".to_string()
}

fn default_sections() -> Vec<String> {
	["property-rates", "projects", "new-projects"].into_iter().map(String::from).collect()
}

fn default_reserved() -> Vec<String> {
	["search", "disambiguate", "go", "redirect", "api", "health"]
		.into_iter()
		.map(String::from)
		.collect()
}

fn default_cities() -> HashMap<String, String> {
	[
		("pune", "city_pune"),
		("mumbai", "city_mumbai"),
		("noida", "city_noida"),
		("gurgaon", "city_gurgaon"),
		("delhi", "city_delhi"),
		("bangalore", "city_bangalore"),
		("hyderabad", "city_hyderabad"),
		("chennai", "city_chennai"),
	]
	.into_iter()
	.map(|(slug, id)| (slug.to_string(), id.to_string()))
	.collect()
}
