use serde::{Deserialize, Deserializer, Serialize};

/// A ranked entity as returned by the backend. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
	#[serde(default, deserialize_with = "null_as_default")]
	pub id: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub entity_type: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_name: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub canonical_url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub score: Option<f64>,
}

/// Suggest and listing payloads. The backend answers either with a flat `candidates` list or
/// with type buckets under `groups`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateSet {
	#[serde(default, alias = "q", deserialize_with = "null_as_default")]
	pub query: String,
	#[serde(default, alias = "normalized_q", deserialize_with = "null_as_default")]
	pub normalized_query: String,
	#[serde(default)]
	pub did_you_mean: Option<String>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub candidates: Vec<Candidate>,
	#[serde(default)]
	pub groups: Option<CandidateGroups>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateGroups {
	#[serde(default, deserialize_with = "null_as_default")]
	pub locations: Vec<Candidate>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub projects: Vec<Candidate>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub builders: Vec<Candidate>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub rate_pages: Vec<Candidate>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub property_pdps: Vec<Candidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAction {
	Redirect,
	Serp,
	Disambiguate,
	Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveResponse {
	#[serde(default, deserialize_with = "null_as_default")]
	pub action: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub query: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub normalized_query: String,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default, rename = "match")]
	pub matched: Option<Candidate>,
	#[serde(default)]
	pub candidates: Option<Vec<Candidate>>,
	/// Diagnostic only.
	#[serde(default)]
	pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
	#[serde(alias = "raw_query")]
	pub q: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub normalized_query: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentResponse {
	#[serde(default)]
	pub ok: bool,
	#[serde(default, alias = "recent_searches", deserialize_with = "null_as_default")]
	pub items: Vec<RecentSearch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearRecentResponse {
	#[serde(default)]
	pub ok: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestRequest {
	pub q: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub context_url: Option<String>,
	pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveRequest {
	pub q: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub context_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
	pub q: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub context_url: Option<String>,
	pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub context_url: Option<String>,
	pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearRecentRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub context_url: Option<String>,
}

impl Candidate {
	/// Entity id and type are both needed to attribute a click.
	pub fn is_attributable(&self) -> bool {
		!self.id.trim().is_empty() && !self.entity_type.trim().is_empty()
	}
}

impl CandidateSet {
	/// One ranked list: the flat list when present, otherwise the buckets in display order.
	pub fn into_ranked(self) -> Vec<Candidate> {
		if !self.candidates.is_empty() {
			return self.candidates;
		}

		let Some(groups) = self.groups else {
			return Vec::new();
		};

		[groups.locations, groups.projects, groups.builders, groups.rate_pages, groups.property_pdps]
			.into_iter()
			.flatten()
			.collect()
	}
}

impl ResolveAction {
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"redirect" => Self::Redirect,
			"serp" => Self::Serp,
			"disambiguate" => Self::Disambiguate,
			_ => Self::Unknown,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Redirect => "redirect",
			Self::Serp => "serp",
			Self::Disambiguate => "disambiguate",
			Self::Unknown => "unknown",
		}
	}
}

impl ResolveResponse {
	pub fn action(&self) -> ResolveAction {
		ResolveAction::parse(&self.action)
	}

	/// The destination URL, when the backend supplied a non-blank one.
	pub fn destination(&self) -> Option<&str> {
		self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
	}

	pub fn disambiguation_candidates(&self) -> &[Candidate] {
		self.candidates.as_deref().unwrap_or_default()
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
