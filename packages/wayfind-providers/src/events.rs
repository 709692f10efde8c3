use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use wayfind_domain::QueryId;

/// Recorded when a query is committed, before it is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEvent {
	pub query_id: QueryId,
	pub raw_query: String,
	pub normalized_query: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	pub context_url: String,
	#[serde(with = "crate::time_serde")]
	pub timestamp: OffsetDateTime,
}

/// Recorded when a candidate with a known rank, id and type is activated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
	pub query_id: QueryId,
	pub entity_id: String,
	pub entity_type: String,
	pub rank: u32,
	pub url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city_id: Option<String>,
	pub context_url: String,
	#[serde(with = "crate::time_serde")]
	pub timestamp: OffsetDateTime,
}
