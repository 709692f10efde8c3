use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Duration,
};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use wayfind_config::Suggest;
use wayfind_domain::{QueryId, Scope, path};
use wayfind_providers::{Candidate, ClearRecentRequest, RecentRequest, RecentSearch, SuggestRequest};

use crate::{DirectTarget, QueryTarget, Result, SearchBackend, Target};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
	/// Not focused. Nothing is shown.
	#[default]
	Idle,
	/// Focused with an empty query. Recent searches are shown.
	ZeroState,
	/// Focused with a query. Live suggestions are shown.
	Suggesting,
}

/// What the overlay renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestView {
	pub phase: Phase,
	pub query: String,
	pub suggestions: Vec<Candidate>,
	pub did_you_mean: Option<String>,
	/// Set instead of suggestions when the input reads as a URL or path.
	pub path_hint: Option<String>,
	pub recents: Vec<RecentSearch>,
	pub loading: bool,
	pub error: Option<String>,
}

/// Autocomplete state for one search input.
///
/// Each keystroke supersedes the previous suggestion fetch: the older fetch is cancelled and,
/// should it finish anyway, its result is discarded. The rendered list therefore follows
/// dispatch order rather than completion order.
pub struct SuggestionController {
	backend: Arc<dyn SearchBackend>,
	settings: Suggest,
	scope: Scope,
	qid: Option<QueryId>,
	view: Arc<watch::Sender<SuggestView>>,
	epoch: Arc<AtomicU64>,
	inflight: Option<CancellationToken>,
	recents_inflight: Option<CancellationToken>,
}
impl SuggestionController {
	pub fn new(backend: Arc<dyn SearchBackend>, settings: Suggest, scope: Scope) -> Self {
		let (view, _) = watch::channel(SuggestView::default());

		Self {
			backend,
			settings,
			scope,
			qid: None,
			view: Arc::new(view),
			epoch: Arc::new(AtomicU64::new(0)),
			inflight: None,
			recents_inflight: None,
		}
	}

	pub fn subscribe(&self) -> watch::Receiver<SuggestView> {
		self.view.subscribe()
	}

	pub fn view(&self) -> SuggestView {
		self.view.borrow().clone()
	}

	pub fn scope(&self) -> &Scope {
		&self.scope
	}

	/// Carries a session's query id into the targets this controller produces.
	pub fn set_query_id(&mut self, qid: QueryId) {
		self.qid = Some(qid);
	}

	pub fn focus(&mut self) {
		let query = self.view.borrow().query.clone();

		self.input(query);
	}

	pub fn blur(&mut self) {
		self.supersede();
		self.cancel_recents();
		self.view.send_modify(|view| {
			view.phase = Phase::Idle;
			view.loading = false;
		});
	}

	pub fn input(&mut self, text: impl Into<String>) {
		let text = text.into();
		let epoch = self.supersede();

		if text.trim().is_empty() {
			let was_zero_state = self.view.borrow().phase == Phase::ZeroState;

			self.view.send_modify(|view| {
				view.phase = Phase::ZeroState;
				view.query = text;
				view.suggestions.clear();
				view.did_you_mean = None;
				view.path_hint = None;
				view.loading = false;
				view.error = None;
			});

			if !was_zero_state {
				self.load_recents();
			}

			return;
		}

		self.cancel_recents();

		let suppressed = path::looks_like_path(&text);
		let path_hint = if suppressed { path::extract_path_candidate(&text) } else { None };

		self.view.send_modify(|view| {
			view.phase = Phase::Suggesting;
			view.query = text.clone();
			view.path_hint = path_hint;
			view.error = None;
			view.loading = !suppressed;

			if suppressed {
				view.suggestions.clear();
				view.did_you_mean = None;
			}
		});

		if suppressed {
			return;
		}

		let token = CancellationToken::new();

		self.inflight = Some(token.clone());

		let req = SuggestRequest {
			q: text.trim().to_string(),
			city_id: self.scope.city_id.clone(),
			context_url: Some(self.scope.context_url.clone()),
			limit: self.settings.limit,
		};
		let backend = self.backend.clone();
		let view = self.view.clone();
		let current = self.epoch.clone();
		let debounce = Duration::from_millis(self.settings.debounce_ms);

		tokio::spawn(async move {
			tokio::select! {
				_ = token.cancelled() => return,
				_ = tokio::time::sleep(debounce) => {},
			}

			let result = tokio::select! {
				_ = token.cancelled() => return,
				result = backend.suggest(&req) => result,
			};

			view.send_if_modified(|view| {
				if token.is_cancelled() || current.load(Ordering::SeqCst) != epoch {
					return false;
				}

				view.loading = false;

				match result {
					Ok(set) => {
						view.did_you_mean = set.did_you_mean.clone();
						view.suggestions = set.into_ranked();
						view.error = None;
					},
					Err(err) => {
						tracing::warn!(q = %req.q, error = %err, "Suggestion fetch failed.");

						view.suggestions.clear();
						view.did_you_mean = None;
						view.error = Some("Suggestions are unavailable right now.".to_string());
					},
				}

				true
			});
		});
	}

	/// Enter. The typed query goes to the orchestrator; an empty one navigates home.
	pub fn commit(&mut self) -> Target {
		let q = self.view.borrow().query.trim().to_string();

		self.blur();

		Target::Query(QueryTarget {
			q,
			qid: self.qid.clone(),
			city_id: self.scope.city_id.clone(),
			context_url: Some(self.scope.context_url.clone()),
		})
	}

	/// Activates the suggestion at `index`; its rank is `index + 1`.
	pub fn activate(&mut self, index: usize) -> Option<Target> {
		let candidate = self.view.borrow().suggestions.get(index).cloned()?;
		let rank = u32::try_from(index + 1).ok();

		self.blur();

		Some(Target::Direct(DirectTarget {
			url: candidate.canonical_url,
			entity_id: Some(candidate.id).filter(|id| !id.trim().is_empty()),
			entity_type: Some(candidate.entity_type).filter(|kind| !kind.trim().is_empty()),
			rank,
			qid: self.qid.clone(),
			city_id: self.scope.city_id.clone(),
			context_url: Some(self.scope.context_url.clone()),
		}))
	}

	/// Re-runs a recent search as a committed query in that search's own scope.
	pub fn activate_recent(&mut self, index: usize) -> Option<Target> {
		let recent = self.view.borrow().recents.get(index).cloned()?;

		self.blur();

		Some(Target::Query(QueryTarget {
			q: recent.q,
			qid: self.qid.clone(),
			city_id: recent.city_id.or_else(|| self.scope.city_id.clone()),
			context_url: recent.context_url.or_else(|| Some(self.scope.context_url.clone())),
		}))
	}

	/// Empties the recents list once the clear call reaches the backend, whatever it answers.
	pub async fn clear_recents(&mut self) -> Result<()> {
		self.cancel_recents();

		let req = ClearRecentRequest {
			city_id: self.scope.city_id.clone(),
			context_url: Some(self.scope.context_url.clone()),
		};

		match self.backend.clear_recent(&req).await {
			Ok(_) => {
				self.view.send_modify(|view| {
					view.recents.clear();
					view.error = None;
				});

				Ok(())
			},
			Err(err) => {
				tracing::warn!(error = %err, "Clearing recent searches failed.");

				self.view.send_modify(|view| {
					view.error = Some("Could not clear recent searches.".to_string());
				});

				Err(err.into())
			},
		}
	}

	fn supersede(&mut self) -> u64 {
		if let Some(token) = self.inflight.take() {
			token.cancel();
		}

		self.epoch.fetch_add(1, Ordering::SeqCst) + 1
	}

	fn cancel_recents(&mut self) {
		if let Some(token) = self.recents_inflight.take() {
			token.cancel();
		}
	}

	fn load_recents(&mut self) {
		self.cancel_recents();

		let token = CancellationToken::new();

		self.recents_inflight = Some(token.clone());

		let req = RecentRequest {
			city_id: self.scope.city_id.clone(),
			context_url: Some(self.scope.context_url.clone()),
			limit: self.settings.recent_limit,
		};
		let backend = self.backend.clone();
		let view = self.view.clone();

		tokio::spawn(async move {
			let result = tokio::select! {
				_ = token.cancelled() => return,
				result = backend.recent(&req) => result,
			};

			view.send_if_modified(|view| {
				if token.is_cancelled() {
					return false;
				}

				match result {
					Ok(res) => {
						view.recents = res.items;

						if view.phase == Phase::ZeroState {
							view.error = None;
						}
					},
					Err(err) => {
						tracing::warn!(error = %err, "Recent searches fetch failed.");

						if view.phase == Phase::ZeroState {
							view.error = Some("Recent searches are unavailable right now.".to_string());
						}
					},
				}

				true
			});
		});
	}
}

impl Drop for SuggestionController {
	fn drop(&mut self) {
		self.supersede();
		self.cancel_recents();
	}
}
