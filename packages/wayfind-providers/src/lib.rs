pub mod client;
pub mod events;
pub mod time_serde;
pub mod types;

mod error;

pub use client::{BackendClient, Dispatch};
pub use error::{Error, Result};
pub use events::{ClickEvent, SearchEvent};
pub use types::{
	Candidate, CandidateGroups, CandidateSet, ClearRecentRequest, ClearRecentResponse,
	RecentRequest, RecentResponse, RecentSearch, ResolveAction, ResolveRequest, ResolveResponse,
	SearchRequest, SuggestRequest,
};

use reqwest::header::{HeaderMap, HeaderName};
use serde_json::{Map, Value};

/// Headers sent with every backend call.
pub fn default_headers(configured: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in configured {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
