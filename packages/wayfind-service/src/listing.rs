use serde::{Deserialize, Serialize};

use wayfind_domain::{QueryId, Scope};
use wayfind_providers::{Candidate, SearchRequest};

use crate::{Error, Result, WayfindService};

const LISTING_LIMIT: u32 = 25;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingRequest {
	pub q: Option<String>,
	pub qid: Option<String>,
	pub city_id: Option<String>,
	pub context_url: Option<String>,
}

/// A candidate rendered as a link through the redirect entry point, so activating it is
/// attributed to the page's query id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLink {
	pub rank: u32,
	pub id: String,
	pub name: String,
	pub entity_type: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
	pub q: String,
	pub qid: QueryId,
	pub city_id: Option<String>,
	pub context_url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub did_you_mean: Option<String>,
	pub results: Vec<RankedLink>,
	/// Inline, non-blocking message when results could not be loaded.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl WayfindService {
	pub async fn listing(&self, req: ListingRequest) -> Result<ListingPage> {
		let q = required_query(req.q.as_deref())?;
		let scope = self.scope(req.city_id.as_deref(), req.context_url.as_deref());
		let qid = QueryId::reuse_or_generate(QueryId::from_param(req.qid.as_deref()));
		let search = SearchRequest {
			q: q.clone(),
			city_id: scope.city_id.clone(),
			context_url: Some(scope.context_url.clone()),
			limit: LISTING_LIMIT,
		};
		let (did_you_mean, results, error) = match self.backend.search(&search).await {
			Ok(set) => {
				let did_you_mean = set.did_you_mean.clone();

				(did_you_mean, self.ranked_links(set.into_ranked(), &qid, &scope), None)
			},
			Err(err) => {
				tracing::warn!(query_id = %qid, error = %err, "Listing fetch failed.");

				(None, Vec::new(), Some("Results are unavailable right now.".to_string()))
			},
		};

		Ok(ListingPage {
			q,
			qid,
			city_id: scope.city_id,
			context_url: scope.context_url,
			did_you_mean,
			results,
			error,
		})
	}

	pub(crate) fn ranked_links(
		&self,
		candidates: Vec<Candidate>,
		qid: &QueryId,
		scope: &Scope,
	) -> Vec<RankedLink> {
		candidates
			.into_iter()
			.filter(|candidate| !candidate.canonical_url.trim().is_empty())
			.zip(1_u32..)
			.map(|(candidate, rank)| RankedLink {
				rank,
				href: self.link_through_go(
					&candidate.canonical_url,
					&candidate.id,
					&candidate.entity_type,
					rank,
					qid,
					scope,
				),
				id: candidate.id,
				name: candidate.name,
				entity_type: candidate.entity_type,
				parent_name: candidate.parent_name,
				city: candidate.city,
			})
			.collect()
	}
}

pub(crate) fn required_query(raw: Option<&str>) -> Result<String> {
	raw.map(str::trim).filter(|q| !q.is_empty()).map(str::to_string).ok_or_else(|| {
		Error::InvalidRequest { message: "q is required.".to_string() }
	})
}
