use std::sync::Arc;

use time::OffsetDateTime;

use wayfind_domain::{QueryId, Scope};
use wayfind_providers::{
	ClickEvent, Dispatch, SearchEvent,
	client::{CLICK_EVENT_PATH, SEARCH_EVENT_PATH},
};

use crate::SearchBackend;

/// Best-effort event recorder. Every event is attempted once and failures never reach the
/// caller.
#[derive(Clone)]
pub struct Telemetry {
	backend: Arc<dyn SearchBackend>,
}

/// What is known about an activated link. Identifying fields may be missing on malformed
/// links.
#[derive(Debug, Clone)]
pub struct ClickAttribution {
	pub query_id: QueryId,
	pub entity_id: Option<String>,
	pub entity_type: Option<String>,
	pub rank: Option<u32>,
	pub url: String,
	pub scope: Scope,
}
impl ClickAttribution {
	/// `None` unless entity id, entity type and a 1-based rank are all present.
	pub fn into_event(self, timestamp: OffsetDateTime) -> Option<ClickEvent> {
		let entity_id = non_blank(self.entity_id)?;
		let entity_type = non_blank(self.entity_type)?;
		let rank = self.rank.filter(|rank| *rank > 0)?;

		Some(ClickEvent {
			query_id: self.query_id,
			entity_id,
			entity_type,
			rank,
			url: self.url,
			city_id: self.scope.city_id,
			context_url: self.scope.context_url,
			timestamp,
		})
	}
}

impl Telemetry {
	pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
		Self { backend }
	}

	/// Dispatches the search event before returning; completion happens in the background.
	pub fn emit_search(&self, event: SearchEvent) {
		let dispatch = self.backend.log_search(&event);

		detach(SEARCH_EVENT_PATH, event.query_id, dispatch);
	}

	/// Returns whether a click event was dispatched. Incomplete attributions are dropped.
	pub fn emit_click(&self, attribution: ClickAttribution) -> bool {
		let Some(event) = attribution.into_event(OffsetDateTime::now_utc()) else {
			tracing::debug!("Dropping click without entity id, entity type and rank.");

			return false;
		};
		let dispatch = self.backend.log_click(&event);

		detach(CLICK_EVENT_PATH, event.query_id, dispatch);

		true
	}
}

fn detach(endpoint: &'static str, query_id: QueryId, dispatch: Dispatch) {
	tokio::spawn(async move {
		if let Err(err) = dispatch.await {
			tracing::warn!(endpoint, query_id = %query_id, error = %err, "Telemetry event dropped.");
		}
	});
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.trim().is_empty())
}
