use std::{collections::HashMap, sync::Mutex, time::Duration};

use wayfind_config::{Backend, Config, Context, Routes, Service, Suggest};
use wayfind_providers::{
	Candidate, CandidateSet, ClearRecentRequest, ClearRecentResponse, ClickEvent, Dispatch, Error,
	RecentRequest, RecentResponse, ResolveRequest, ResolveResponse, SearchEvent, SearchRequest,
	SuggestRequest,
	client::{
		CLEAR_RECENT_PATH, CLICK_EVENT_PATH, RECENT_PATH, RESOLVE_PATH, SEARCH_EVENT_PATH,
		SEARCH_PATH, SUGGEST_PATH,
	},
};
use wayfind_service::{BackendResult, BoxFuture, SearchBackend};

/// One backend call, as the scripted backend saw it.
#[derive(Debug, Clone)]
pub enum Call {
	Suggest(SuggestRequest),
	Resolve(ResolveRequest),
	Search(SearchRequest),
	Recent(RecentRequest),
	ClearRecent(ClearRecentRequest),
	LogSearch(SearchEvent),
	LogClick(ClickEvent),
}

/// A scripted answer: a value or a failure status, optionally after a delay.
#[derive(Debug, Clone)]
pub struct Reply<T> {
	outcome: Result<T, u16>,
	delay: Duration,
}
impl<T> Reply<T> {
	pub fn ok(value: T) -> Self {
		Self { outcome: Ok(value), delay: Duration::ZERO }
	}

	pub fn status(status: u16) -> Self {
		Self { outcome: Err(status), delay: Duration::ZERO }
	}

	pub fn after(mut self, delay: Duration) -> Self {
		self.delay = delay;

		self
	}
}

/// In-memory [`SearchBackend`] with per-query replies and a call log in dispatch order.
///
/// Calls are logged when they are issued, not when they complete. Unscripted queries get an
/// empty candidate set from suggest and search, and a 503 from resolve.
#[derive(Default)]
pub struct ScriptedBackend {
	suggest: HashMap<String, Reply<CandidateSet>>,
	resolve: HashMap<String, Reply<ResolveResponse>>,
	search: HashMap<String, Reply<CandidateSet>>,
	recent: Option<Reply<RecentResponse>>,
	clear_recent: Option<Reply<ClearRecentResponse>>,
	events: Option<Reply<()>>,
	calls: Mutex<Vec<Call>>,
}
impl ScriptedBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_suggest(mut self, q: &str, reply: Reply<CandidateSet>) -> Self {
		self.suggest.insert(q.to_string(), reply);

		self
	}

	pub fn with_resolve(mut self, q: &str, reply: Reply<ResolveResponse>) -> Self {
		self.resolve.insert(q.to_string(), reply);

		self
	}

	pub fn with_search(mut self, q: &str, reply: Reply<CandidateSet>) -> Self {
		self.search.insert(q.to_string(), reply);

		self
	}

	pub fn with_recent(mut self, reply: Reply<RecentResponse>) -> Self {
		self.recent = Some(reply);

		self
	}

	pub fn with_clear_recent(mut self, reply: Reply<ClearRecentResponse>) -> Self {
		self.clear_recent = Some(reply);

		self
	}

	/// Applies to both search and click events.
	pub fn with_events(mut self, reply: Reply<()>) -> Self {
		self.events = Some(reply);

		self
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn suggest_calls(&self) -> Vec<SuggestRequest> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				Call::Suggest(req) => Some(req),
				_ => None,
			})
			.collect()
	}

	pub fn search_events(&self) -> Vec<SearchEvent> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				Call::LogSearch(event) => Some(event),
				_ => None,
			})
			.collect()
	}

	pub fn click_events(&self) -> Vec<ClickEvent> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				Call::LogClick(event) => Some(event),
				_ => None,
			})
			.collect()
	}

	fn record(&self, call: Call) {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).push(call);
	}
}

impl SearchBackend for ScriptedBackend {
	fn suggest<'a>(&'a self, req: &'a SuggestRequest) -> BoxFuture<'a, BackendResult<CandidateSet>> {
		self.record(Call::Suggest(req.clone()));

		let reply =
			self.suggest.get(&req.q).cloned().unwrap_or_else(|| Reply::ok(CandidateSet::default()));

		Box::pin(play(SUGGEST_PATH, reply))
	}

	fn resolve<'a>(
		&'a self,
		req: &'a ResolveRequest,
	) -> BoxFuture<'a, BackendResult<ResolveResponse>> {
		self.record(Call::Resolve(req.clone()));

		let reply = self.resolve.get(&req.q).cloned().unwrap_or_else(|| Reply::status(503));

		Box::pin(play(RESOLVE_PATH, reply))
	}

	fn search<'a>(&'a self, req: &'a SearchRequest) -> BoxFuture<'a, BackendResult<CandidateSet>> {
		self.record(Call::Search(req.clone()));

		let reply =
			self.search.get(&req.q).cloned().unwrap_or_else(|| Reply::ok(CandidateSet::default()));

		Box::pin(play(SEARCH_PATH, reply))
	}

	fn recent<'a>(&'a self, req: &'a RecentRequest) -> BoxFuture<'a, BackendResult<RecentResponse>> {
		self.record(Call::Recent(req.clone()));

		let reply = self.recent.clone().unwrap_or_else(|| Reply::ok(RecentResponse::default()));

		Box::pin(play(RECENT_PATH, reply))
	}

	fn clear_recent<'a>(
		&'a self,
		req: &'a ClearRecentRequest,
	) -> BoxFuture<'a, BackendResult<ClearRecentResponse>> {
		self.record(Call::ClearRecent(req.clone()));

		let reply = self
			.clear_recent
			.clone()
			.unwrap_or_else(|| Reply::ok(ClearRecentResponse { ok: true }));

		Box::pin(play(CLEAR_RECENT_PATH, reply))
	}

	fn log_search(&self, event: &SearchEvent) -> Dispatch {
		self.record(Call::LogSearch(event.clone()));

		Box::pin(play(SEARCH_EVENT_PATH, self.events.clone().unwrap_or_else(|| Reply::ok(()))))
	}

	fn log_click(&self, event: &ClickEvent) -> Dispatch {
		self.record(Call::LogClick(event.clone()));

		Box::pin(play(CLICK_EVENT_PATH, self.events.clone().unwrap_or_else(|| Reply::ok(()))))
	}
}

/// Defaults everywhere, bound to a local port nobody listens on.
pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		backend: Backend::default(),
		suggest: Suggest::default(),
		routes: Routes::default(),
		context: Context::default(),
	}
}

pub fn candidate(id: &str, entity_type: &str, name: &str, canonical_url: &str) -> Candidate {
	Candidate {
		id: id.to_string(),
		entity_type: entity_type.to_string(),
		name: name.to_string(),
		city: None,
		city_id: None,
		parent_name: None,
		canonical_url: canonical_url.to_string(),
		score: None,
	}
}

pub fn candidates(query: &str, items: Vec<Candidate>) -> CandidateSet {
	CandidateSet {
		query: query.to_string(),
		normalized_query: query.to_lowercase(),
		did_you_mean: None,
		candidates: items,
		groups: None,
	}
}

pub fn resolved(action: &str, url: Option<&str>) -> ResolveResponse {
	ResolveResponse {
		action: action.to_string(),
		url: url.map(str::to_string),
		..Default::default()
	}
}

async fn play<T>(endpoint: &'static str, reply: Reply<T>) -> BackendResult<T> {
	if !reply.delay.is_zero() {
		tokio::time::sleep(reply.delay).await;
	}

	reply.outcome.map_err(|status| Error::Status { endpoint, status })
}
