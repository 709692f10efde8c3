use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static inputs for inferring city scope from a path.
#[derive(Debug, Clone)]
pub struct ContextRules {
	sections: Vec<String>,
	reserved: Vec<String>,
	cities: HashMap<String, String>,
}

/// City scope plus the path a search was issued from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
	pub city_id: Option<String>,
	pub context_url: String,
}

impl ContextRules {
	pub fn from_config(cfg: &wayfind_config::Context) -> Self {
		Self {
			sections: cfg.sections.clone(),
			reserved: cfg.reserved.clone(),
			cities: cfg.cities.clone(),
		}
	}

	pub fn city_for_slug(&self, slug: &str) -> Option<&str> {
		self.cities.get(&slug.to_lowercase()).map(String::as_str)
	}

	fn is_section(&self, segment: &str) -> bool {
		self.sections.iter().any(|section| section == segment)
	}

	fn is_reserved(&self, segment: &str) -> bool {
		self.reserved.iter().any(|reserved| reserved == segment)
	}
}

impl Default for ContextRules {
	fn default() -> Self {
		Self::from_config(&wayfind_config::Context::default())
	}
}

impl Scope {
	pub fn resolve(
		rules: &ContextRules,
		explicit_city_id: Option<&str>,
		context_url: Option<&str>,
	) -> Self {
		let context_url = canonical_context_url(context_url);
		let city_id = resolve_context(rules, explicit_city_id, &context_url);

		Self { city_id, context_url }
	}
}

/// An explicit, non-blank city id always wins; otherwise the city is inferred from the path.
/// Unknown slugs and reserved routes yield `None`.
pub fn resolve_context(
	rules: &ContextRules,
	explicit_city_id: Option<&str>,
	context_url: &str,
) -> Option<String> {
	if let Some(city_id) = explicit_city_id
		&& !city_id.trim().is_empty()
	{
		return Some(city_id.to_string());
	}

	let segments = path_segments(context_url);
	let slug = match segments.as_slice() {
		[] => return None,
		[first, second, ..] if rules.is_section(first) => second.as_str(),
		[first, ..] if rules.is_section(first) || rules.is_reserved(first) => return None,
		[first, ..] => first.as_str(),
	};

	rules.city_for_slug(slug).map(str::to_string)
}

/// Opaque "came from" path. Absent or blank input becomes `/`.
pub fn canonical_context_url(raw: Option<&str>) -> String {
	let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
		return "/".to_string();
	};

	if raw.starts_with('/') || raw.contains("://") {
		raw.to_string()
	} else {
		format!("/{raw}")
	}
}

fn path_segments(context_url: &str) -> Vec<String> {
	let without_fragment = context_url.split('#').next().unwrap_or_default();
	let without_query = without_fragment.split('?').next().unwrap_or_default();
	let path = match without_query.split_once("://") {
		Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or_default(),
		None => without_query,
	};

	path.split('/')
		.map(str::trim)
		.filter(|segment| !segment.is_empty())
		.map(str::to_lowercase)
		.collect()
}
