use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlates a search with every navigation and click attributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(String);
impl QueryId {
	pub fn generate() -> Self {
		Self(Uuid::new_v4().simple().to_string())
	}

	/// Accepts an incoming `qid` parameter. Blank values count as absent.
	pub fn from_param(raw: Option<&str>) -> Option<Self> {
		raw.map(str::trim).filter(|value| !value.is_empty()).map(|value| Self(value.to_string()))
	}

	/// Keeps a session's id once assigned; mints one only when none exists yet.
	pub fn reuse_or_generate(existing: Option<Self>) -> Self {
		existing.unwrap_or_else(Self::generate)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for QueryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generated_ids_are_unique() {
		assert_ne!(QueryId::generate(), QueryId::generate());
	}

	#[test]
	fn existing_id_is_never_regenerated() {
		let existing = QueryId::from_param(Some("q-123")).expect("Failed to parse qid.");

		assert_eq!(QueryId::reuse_or_generate(Some(existing.clone())), existing);
	}

	#[test]
	fn blank_param_is_absent() {
		assert_eq!(QueryId::from_param(Some("  ")), None);
		assert_eq!(QueryId::from_param(None), None);
	}
}
