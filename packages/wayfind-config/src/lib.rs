mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Config, Context, DEFAULT_BACKEND_URL, Routes, Service, Suggest};

use std::{env, fs, path::Path};

pub const BACKEND_URL_ENV: &str = "WAYFIND_BACKEND_URL";

pub fn load(path: &Path) -> Result<Config> {
	load_with_env(path, |key| env::var(key).ok())
}

/// Same as [`load`], with the environment lookup injected.
pub fn load_with_env<F>(path: &Path, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	apply_env_overrides(&mut cfg, lookup);
	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn apply_env_overrides<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(url) = lookup(BACKEND_URL_ENV)
		&& !url.trim().is_empty()
	{
		cfg.backend.api_base = Some(url);
	}
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let api_base = cfg.backend.api_base();

	if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
		return Err(Error::BackendUrl { url: api_base.to_string() });
	}
	if cfg.backend.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "backend.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.backend.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("backend.default_headers.{key} must be a string."),
			});
		}
	}

	if !(1..=25).contains(&cfg.suggest.limit) {
		return Err(Error::Validation {
			message: "suggest.limit must be in the range 1-25.".to_string(),
		});
	}
	if !(1..=20).contains(&cfg.suggest.recent_limit) {
		return Err(Error::Validation {
			message: "suggest.recent_limit must be in the range 1-20.".to_string(),
		});
	}

	for (label, route) in [
		("routes.home", &cfg.routes.home),
		("routes.search", &cfg.routes.search),
		("routes.disambiguate", &cfg.routes.disambiguate),
		("routes.go", &cfg.routes.go),
	] {
		if !route.starts_with('/') {
			return Err(Error::Validation { message: format!("{label} must start with '/'.") });
		}
	}

	let served = [&cfg.routes.search, &cfg.routes.disambiguate, &cfg.routes.go];

	if served.iter().enumerate().any(|(i, route)| served[..i].contains(route))
		|| served.iter().any(|route| route.as_str() == "/health")
	{
		return Err(Error::Validation {
			message: "routes.search, routes.disambiguate and routes.go must be distinct and must not \
			          be /health."
				.to_string(),
		});
	}

	for (slug, city_id) in &cfg.context.cities {
		if slug.is_empty() || city_id.trim().is_empty() {
			return Err(Error::Validation {
				message: "context.cities entries must have a non-empty slug and city id."
					.to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.backend.api_base.as_deref().map(|url| url.trim().is_empty()).unwrap_or(false) {
		cfg.backend.api_base = None;
	}
	if let Some(url) = cfg.backend.api_base.as_mut() {
		let trimmed = url.trim().trim_end_matches('/').to_string();

		*url = trimmed;
	}

	cfg.context.sections = cfg.context.sections.iter().map(|s| s.trim().to_lowercase()).collect();
	cfg.context.reserved = cfg.context.reserved.iter().map(|s| s.trim().to_lowercase()).collect();
	cfg.context.cities = cfg
		.context
		.cities
		.drain()
		.map(|(slug, city_id)| (slug.trim().to_lowercase(), city_id.trim().to_string()))
		.collect();
}
