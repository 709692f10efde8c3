use std::{future::Future, pin::Pin, time::Duration};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{
	CandidateSet, ClearRecentRequest, ClearRecentResponse, ClickEvent, Error, RecentRequest,
	RecentResponse, ResolveRequest, ResolveResponse, Result, SearchEvent, SearchRequest,
	SuggestRequest,
};

pub const SUGGEST_PATH: &str = "/search/suggest";
pub const RESOLVE_PATH: &str = "/search/resolve";
pub const SEARCH_PATH: &str = "/search";
pub const RECENT_PATH: &str = "/events/recent";
pub const CLEAR_RECENT_PATH: &str = "/events/recent/clear";
pub const SEARCH_EVENT_PATH: &str = "/events/search";
pub const CLICK_EVENT_PATH: &str = "/events/click";

/// A telemetry send that owns everything it needs.
pub type Dispatch = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// HTTP client for the search backend. Built once from config and shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
	http: Client,
	api_base: String,
}
impl BackendClient {
	pub fn new(cfg: &wayfind_config::Backend) -> Result<Self> {
		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::default_headers(&cfg.default_headers)?)
			.build()?;

		Ok(Self { http, api_base: cfg.api_base().trim_end_matches('/').to_string() })
	}

	pub fn api_base(&self) -> &str {
		&self.api_base
	}

	pub async fn suggest(&self, req: &SuggestRequest) -> Result<CandidateSet> {
		read_json(SUGGEST_PATH, self.http.get(self.endpoint(SUGGEST_PATH)).query(req)).await
	}

	pub async fn resolve(&self, req: &ResolveRequest) -> Result<ResolveResponse> {
		read_json(RESOLVE_PATH, self.http.get(self.endpoint(RESOLVE_PATH)).query(req)).await
	}

	pub async fn search(&self, req: &SearchRequest) -> Result<CandidateSet> {
		read_json(SEARCH_PATH, self.http.get(self.endpoint(SEARCH_PATH)).query(req)).await
	}

	pub async fn recent(&self, req: &RecentRequest) -> Result<RecentResponse> {
		read_json(RECENT_PATH, self.http.get(self.endpoint(RECENT_PATH)).query(req)).await
	}

	pub async fn clear_recent(&self, req: &ClearRecentRequest) -> Result<ClearRecentResponse> {
		read_json(CLEAR_RECENT_PATH, self.http.post(self.endpoint(CLEAR_RECENT_PATH)).json(req))
			.await
	}

	/// The request is built before this returns; the returned future only sends it.
	pub fn log_search(&self, event: &SearchEvent) -> Dispatch {
		let request = self.http.post(self.endpoint(SEARCH_EVENT_PATH)).json(event);

		Box::pin(send_only(SEARCH_EVENT_PATH, request))
	}

	/// The request is built before this returns; the returned future only sends it.
	pub fn log_click(&self, event: &ClickEvent) -> Dispatch {
		let request = self.http.post(self.endpoint(CLICK_EVENT_PATH)).json(event);

		Box::pin(send_only(CLICK_EVENT_PATH, request))
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}{}", self.api_base, path)
	}
}

async fn read_json<T>(endpoint: &'static str, request: RequestBuilder) -> Result<T>
where
	T: DeserializeOwned,
{
	let res = request.send().await?;
	let status = res.status();

	if !status.is_success() {
		return Err(Error::Status { endpoint, status: status.as_u16() });
	}

	let bytes = res.bytes().await?;

	Ok(serde_json::from_slice(&bytes)?)
}

async fn send_only(endpoint: &'static str, request: RequestBuilder) -> Result<()> {
	let res = request.send().await?;
	let status = res.status();

	if !status.is_success() {
		return Err(Error::Status { endpoint, status: status.as_u16() });
	}

	Ok(())
}
