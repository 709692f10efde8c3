use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use wayfind_domain::{QueryId, Scope, redirect};
use wayfind_providers::{ResolveAction, ResolveRequest, SearchEvent};

use crate::{ClickAttribution, WayfindService};

/// Parameters accepted by the redirect entry point, in either the direct-click or the query
/// form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoParams {
	pub url: Option<String>,
	pub entity_id: Option<String>,
	pub entity_type: Option<String>,
	pub rank: Option<String>,
	pub q: Option<String>,
	pub qid: Option<String>,
	pub city_id: Option<String>,
	pub context_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
	Direct(DirectTarget),
	Query(QueryTarget),
}

/// A pre-resolved click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectTarget {
	pub url: String,
	pub entity_id: Option<String>,
	pub entity_type: Option<String>,
	pub rank: Option<u32>,
	pub qid: Option<QueryId>,
	pub city_id: Option<String>,
	pub context_url: Option<String>,
}

/// A committed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTarget {
	pub q: String,
	pub qid: Option<QueryId>,
	pub city_id: Option<String>,
	pub context_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
	Direct,
	Redirect,
	Serp,
	Disambiguate,
	Fallback,
	Home,
}

/// The single navigation a target produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
	pub url: String,
	pub kind: NavigationKind,
	pub qid: Option<QueryId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}

impl From<GoParams> for Target {
	fn from(params: GoParams) -> Self {
		let qid = QueryId::from_param(params.qid.as_deref());

		match params.url.filter(|url| !url.trim().is_empty()) {
			Some(url) => Self::Direct(DirectTarget {
				url,
				entity_id: params.entity_id,
				entity_type: params.entity_type,
				rank: params.rank.and_then(|rank| rank.trim().parse().ok()),
				qid,
				city_id: params.city_id,
				context_url: params.context_url,
			}),
			None => Self::Query(QueryTarget {
				q: params.q.unwrap_or_default(),
				qid,
				city_id: params.city_id,
				context_url: params.context_url,
			}),
		}
	}
}

impl WayfindService {
	/// Turns a target into exactly one navigation. Backend and telemetry failures degrade to a
	/// safe destination and never surface as errors.
	pub async fn orchestrate(&self, target: Target) -> Navigation {
		match target {
			Target::Direct(direct) => self.navigate_direct(direct),
			Target::Query(query) => self.navigate_query(query).await,
		}
	}

	fn navigate_direct(&self, target: DirectTarget) -> Navigation {
		let scope = self.scope(target.city_id.as_deref(), target.context_url.as_deref());
		let qid = QueryId::reuse_or_generate(target.qid);

		self.telemetry.emit_click(ClickAttribution {
			query_id: qid.clone(),
			entity_id: target.entity_id,
			entity_type: target.entity_type,
			rank: target.rank,
			url: target.url.clone(),
			scope: scope.clone(),
		});

		Navigation {
			url: with_tracking(&target.url, &qid, &scope),
			kind: NavigationKind::Direct,
			qid: Some(qid),
			reason: None,
		}
	}

	async fn navigate_query(&self, target: QueryTarget) -> Navigation {
		let q = target.q.trim();

		if q.is_empty() {
			return Navigation {
				url: self.cfg.routes.home.clone(),
				kind: NavigationKind::Home,
				qid: None,
				reason: None,
			};
		}

		let scope = self.scope(target.city_id.as_deref(), target.context_url.as_deref());
		let qid = QueryId::reuse_or_generate(target.qid);

		self.telemetry.emit_search(SearchEvent {
			query_id: qid.clone(),
			raw_query: q.to_string(),
			normalized_query: q.to_string(),
			city_id: scope.city_id.clone(),
			context_url: scope.context_url.clone(),
			timestamp: OffsetDateTime::now_utc(),
		});

		let req = ResolveRequest {
			q: q.to_string(),
			city_id: scope.city_id.clone(),
			context_url: Some(scope.context_url.clone()),
		};
		let res = match self.backend.resolve(&req).await {
			Ok(res) => res,
			Err(err) => {
				tracing::warn!(query_id = %qid, error = %err, "Resolve failed. Falling back to listing.");

				return self.fallback(q, qid, &scope, "resolve_failed");
			},
		};
		let action = res.action();

		if action == ResolveAction::Disambiguate && !res.disambiguation_candidates().is_empty() {
			return Navigation {
				url: route_with_query(&self.cfg.routes.disambiguate, q, &qid, &scope),
				kind: NavigationKind::Disambiguate,
				qid: Some(qid),
				reason: res.reason,
			};
		}

		let Some(url) = res.destination() else {
			tracing::info!(
				query_id = %qid,
				action = %res.action,
				"Resolve returned no destination. Falling back to listing."
			);

			return self.fallback(q, qid, &scope, "no_destination");
		};
		let kind = match action {
			ResolveAction::Serp => NavigationKind::Serp,
			_ => NavigationKind::Redirect,
		};

		Navigation { url: with_tracking(url, &qid, &scope), kind, qid: Some(qid), reason: res.reason }
	}

	fn fallback(&self, q: &str, qid: QueryId, scope: &Scope, reason: &str) -> Navigation {
		Navigation {
			url: route_with_query(&self.cfg.routes.search, q, &qid, scope),
			kind: NavigationKind::Fallback,
			qid: Some(qid),
			reason: Some(reason.to_string()),
		}
	}
}

/// Adds `qid`, `context_url` and `city_id` to a destination without overriding any of them.
pub fn with_tracking(url: &str, qid: &QueryId, scope: &Scope) -> String {
	redirect::merge(
		url,
		&[
			("qid", Some(qid.as_str())),
			("context_url", Some(scope.context_url.as_str())),
			("city_id", scope.city_id.as_deref()),
		],
	)
}

pub(crate) fn route_with_query(route: &str, q: &str, qid: &QueryId, scope: &Scope) -> String {
	redirect::merge(
		route,
		&[
			("q", Some(q)),
			("qid", Some(qid.as_str())),
			("context_url", Some(scope.context_url.as_str())),
			("city_id", scope.city_id.as_deref()),
		],
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn url_param_selects_direct_target() {
		let target = Target::from(GoParams {
			url: Some("/pune/baner".to_string()),
			entity_id: Some("loc_baner".to_string()),
			rank: Some(" 3 ".to_string()),
			q: Some("ignored".to_string()),
			..Default::default()
		});
		let Target::Direct(direct) = target else {
			panic!("Expected a direct target.");
		};

		assert_eq!(direct.rank, Some(3));
		assert_eq!(direct.entity_id.as_deref(), Some("loc_baner"));
	}

	#[test]
	fn blank_url_selects_query_target() {
		let target = Target::from(GoParams {
			url: Some("  ".to_string()),
			q: Some("baner".to_string()),
			qid: Some("q1".to_string()),
			..Default::default()
		});

		assert_eq!(
			target,
			Target::Query(QueryTarget {
				q: "baner".to_string(),
				qid: QueryId::from_param(Some("q1")),
				city_id: None,
				context_url: None,
			})
		);
	}

	#[test]
	fn malformed_rank_is_treated_as_missing() {
		let Target::Direct(direct) = Target::from(GoParams {
			url: Some("/x".to_string()),
			rank: Some("first".to_string()),
			..Default::default()
		}) else {
			panic!("Expected a direct target.");
		};

		assert_eq!(direct.rank, None);
	}

	#[test]
	fn tracking_keeps_existing_params() {
		let scope = Scope { city_id: Some("city_pune".to_string()), context_url: "/pune".to_string() };
		let qid = QueryId::from_param(Some("new")).expect("Failed to parse qid.");

		assert_eq!(
			with_tracking("/pune/baner?qid=old", &qid, &scope),
			"/pune/baner?qid=old&context_url=/pune&city_id=city_pune"
		);
	}
}
