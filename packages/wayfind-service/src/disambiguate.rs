use serde::{Deserialize, Serialize};

use wayfind_domain::QueryId;
use wayfind_providers::{ResolveAction, ResolveRequest};

use crate::{RankedLink, Result, WayfindService, listing, resolve};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisambiguateRequest {
	pub q: Option<String>,
	pub qid: Option<String>,
	pub city_id: Option<String>,
	pub context_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisambiguatePage {
	pub q: String,
	pub qid: QueryId,
	pub city_id: Option<String>,
	pub context_url: String,
	/// The action the backend returned on this resolution, which may differ from the one that
	/// led here.
	pub action: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
	pub candidates: Vec<RankedLink>,
	pub listing_url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl WayfindService {
	/// Resolves the query again and renders the candidates it returns.
	///
	/// When the backend no longer answers `disambiguate`, the single match is offered instead.
	pub async fn disambiguate(&self, req: DisambiguateRequest) -> Result<DisambiguatePage> {
		let q = listing::required_query(req.q.as_deref())?;
		let scope = self.scope(req.city_id.as_deref(), req.context_url.as_deref());
		let qid = QueryId::reuse_or_generate(QueryId::from_param(req.qid.as_deref()));
		let listing_url = resolve::route_with_query(&self.cfg.routes.search, &q, &qid, &scope);
		let request = ResolveRequest {
			q: q.clone(),
			city_id: scope.city_id.clone(),
			context_url: Some(scope.context_url.clone()),
		};
		let (action, reason, candidates, error) = match self.backend.resolve(&request).await {
			Ok(res) => {
				let action = res.action();

				if action != ResolveAction::Disambiguate {
					tracing::info!(
						query_id = %qid,
						action = action.as_str(),
						"Re-resolution did not disambiguate."
					);
				}

				let candidates = match (res.candidates, res.matched) {
					(Some(candidates), _) if !candidates.is_empty() => candidates,
					(_, Some(matched)) => vec![matched],
					_ => Vec::new(),
				};

				(
					action.as_str().to_string(),
					res.reason,
					self.ranked_links(candidates, &qid, &scope),
					None,
				)
			},
			Err(err) => {
				tracing::warn!(query_id = %qid, error = %err, "Disambiguation resolve failed.");

				(
					ResolveAction::Unknown.as_str().to_string(),
					None,
					Vec::new(),
					Some("Matches are unavailable right now.".to_string()),
				)
			},
		};

		Ok(DisambiguatePage {
			q,
			qid,
			city_id: scope.city_id,
			context_url: scope.context_url,
			action,
			reason,
			candidates,
			listing_url,
			error,
		})
	}
}
