pub mod disambiguate;
pub mod listing;
pub mod resolve;
pub mod suggest;
pub mod telemetry;

mod error;

pub use disambiguate::{DisambiguatePage, DisambiguateRequest};
pub use error::{Error, Result};
pub use listing::{ListingPage, ListingRequest, RankedLink};
pub use resolve::{DirectTarget, GoParams, Navigation, NavigationKind, QueryTarget, Target};
pub use suggest::{Phase, SuggestView, SuggestionController};
pub use telemetry::{ClickAttribution, Telemetry};

use std::{future::Future, pin::Pin, sync::Arc};

use wayfind_config::Config;
use wayfind_domain::{ContextRules, QueryId, Scope};
use wayfind_providers::{
	BackendClient, CandidateSet, ClearRecentRequest, ClearRecentResponse, ClickEvent, Dispatch,
	RecentRequest, RecentResponse, ResolveRequest, ResolveResponse, SearchEvent, SearchRequest,
	SuggestRequest,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type BackendResult<T> = wayfind_providers::Result<T>;

/// Everything the navigation layer needs from the search backend.
///
/// Query calls borrow their request for the life of the future. Event calls must record
/// their dispatch before returning so callers can rely on the order they were issued in.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn suggest<'a>(&'a self, req: &'a SuggestRequest) -> BoxFuture<'a, BackendResult<CandidateSet>>;

	fn resolve<'a>(
		&'a self,
		req: &'a ResolveRequest,
	) -> BoxFuture<'a, BackendResult<ResolveResponse>>;

	fn search<'a>(&'a self, req: &'a SearchRequest) -> BoxFuture<'a, BackendResult<CandidateSet>>;

	fn recent<'a>(&'a self, req: &'a RecentRequest) -> BoxFuture<'a, BackendResult<RecentResponse>>;

	fn clear_recent<'a>(
		&'a self,
		req: &'a ClearRecentRequest,
	) -> BoxFuture<'a, BackendResult<ClearRecentResponse>>;

	fn log_search(&self, event: &SearchEvent) -> Dispatch;

	fn log_click(&self, event: &ClickEvent) -> Dispatch;
}

pub struct WayfindService {
	pub cfg: Config,
	pub rules: ContextRules,
	pub backend: Arc<dyn SearchBackend>,
	pub telemetry: Telemetry,
}

struct DefaultBackend {
	client: BackendClient,
}

impl SearchBackend for DefaultBackend {
	fn suggest<'a>(&'a self, req: &'a SuggestRequest) -> BoxFuture<'a, BackendResult<CandidateSet>> {
		Box::pin(self.client.suggest(req))
	}

	fn resolve<'a>(
		&'a self,
		req: &'a ResolveRequest,
	) -> BoxFuture<'a, BackendResult<ResolveResponse>> {
		Box::pin(self.client.resolve(req))
	}

	fn search<'a>(&'a self, req: &'a SearchRequest) -> BoxFuture<'a, BackendResult<CandidateSet>> {
		Box::pin(self.client.search(req))
	}

	fn recent<'a>(&'a self, req: &'a RecentRequest) -> BoxFuture<'a, BackendResult<RecentResponse>> {
		Box::pin(self.client.recent(req))
	}

	fn clear_recent<'a>(
		&'a self,
		req: &'a ClearRecentRequest,
	) -> BoxFuture<'a, BackendResult<ClearRecentResponse>> {
		Box::pin(self.client.clear_recent(req))
	}

	fn log_search(&self, event: &SearchEvent) -> Dispatch {
		self.client.log_search(event)
	}

	fn log_click(&self, event: &ClickEvent) -> Dispatch {
		self.client.log_click(event)
	}
}

impl WayfindService {
	pub fn new(cfg: Config) -> Result<Self> {
		let client = BackendClient::new(&cfg.backend)?;

		Ok(Self::with_backend(cfg, Arc::new(DefaultBackend { client })))
	}

	pub fn with_backend(cfg: Config, backend: Arc<dyn SearchBackend>) -> Self {
		let rules = ContextRules::from_config(&cfg.context);
		let telemetry = Telemetry::new(backend.clone());

		Self { cfg, rules, backend, telemetry }
	}

	pub fn scope(&self, city_id: Option<&str>, context_url: Option<&str>) -> Scope {
		Scope::resolve(&self.rules, city_id, context_url)
	}

	/// A fresh controller for one search input, scoped to the page it lives on.
	pub fn suggestion_controller(&self, scope: Scope) -> SuggestionController {
		SuggestionController::new(self.backend.clone(), self.cfg.suggest.clone(), scope)
	}

	pub(crate) fn link_through_go(
		&self,
		url: &str,
		entity_id: &str,
		entity_type: &str,
		rank: u32,
		qid: &QueryId,
		scope: &Scope,
	) -> String {
		let rank = rank.to_string();

		wayfind_domain::redirect::merge(
			&self.cfg.routes.go,
			&[
				("url", Some(url)),
				("entity_id", Some(entity_id)),
				("entity_type", Some(entity_type)),
				("rank", Some(rank.as_str())),
				("qid", Some(qid.as_str())),
				("context_url", Some(scope.context_url.as_str())),
				("city_id", scope.city_id.as_deref()),
			],
		)
	}
}
