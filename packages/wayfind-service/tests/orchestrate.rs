use std::{sync::Arc, time::Duration};

use wayfind_domain::QueryId;
use wayfind_providers::ResolveResponse;
use wayfind_service::{
	DirectTarget, DisambiguateRequest, Error, ListingRequest, NavigationKind, QueryTarget, Target,
	WayfindService,
};
use wayfind_testkit::{Call, Reply, ScriptedBackend, candidate, candidates, resolved, test_config};

fn service(backend: &Arc<ScriptedBackend>) -> WayfindService {
	WayfindService::with_backend(test_config(), backend.clone())
}

fn query_from_pune(q: &str) -> Target {
	Target::Query(QueryTarget {
		q: q.to_string(),
		qid: None,
		city_id: None,
		context_url: Some("/pune".to_string()),
	})
}

fn qid_of(nav: &wayfind_service::Navigation) -> String {
	nav.qid.as_ref().expect("Expected a query id.").to_string()
}

#[tokio::test]
async fn redirect_merges_tracking_params() {
	let backend = Arc::new(
		ScriptedBackend::new()
			.with_resolve("baner", Reply::ok(resolved("redirect", Some("/pune/baner")))),
	);
	let nav = service(&backend).orchestrate(query_from_pune("baner")).await;
	let qid = qid_of(&nav);

	assert_eq!(nav.kind, NavigationKind::Redirect);
	assert_eq!(nav.url, format!("/pune/baner?qid={qid}&context_url=/pune&city_id=city_pune"));
}

#[tokio::test]
async fn search_event_is_dispatched_before_resolve() {
	let backend = Arc::new(
		ScriptedBackend::new()
			.with_resolve("baner", Reply::ok(resolved("redirect", Some("/pune/baner")))),
	);
	let nav = service(&backend).orchestrate(query_from_pune("baner")).await;
	let calls = backend.calls();

	assert_eq!(calls.len(), 2);

	let Call::LogSearch(event) = &calls[0] else {
		panic!("Expected the search event first, got {:?}.", calls[0]);
	};

	assert!(matches!(calls[1], Call::Resolve(_)));
	assert_eq!(event.raw_query, "baner");
	assert_eq!(event.city_id.as_deref(), Some("city_pune"));
	assert_eq!(event.context_url, "/pune");
	assert_eq!(Some(&event.query_id), nav.qid.as_ref());
}

#[tokio::test]
async fn resolve_failure_falls_back_to_listing() {
	let backend = Arc::new(ScriptedBackend::new().with_resolve("baner", Reply::status(502)));
	let nav = service(&backend).orchestrate(query_from_pune("baner")).await;
	let qid = qid_of(&nav);

	assert_eq!(nav.kind, NavigationKind::Fallback);
	assert_eq!(nav.url, format!("/search?q=baner&qid={qid}&context_url=/pune&city_id=city_pune"));
	assert_eq!(backend.search_events().len(), 1);
}

#[tokio::test]
async fn response_without_destination_falls_back() {
	let backend = Arc::new(
		ScriptedBackend::new()
			.with_resolve("baner", Reply::ok(resolved("redirect", Some("   "))))
			.with_resolve("2 bhk", Reply::ok(resolved("disambiguate", None))),
	);
	let service = service(&backend);
	let blank = service.orchestrate(query_from_pune("baner")).await;
	let empty_disambiguation = service.orchestrate(query_from_pune("2 bhk")).await;

	assert_eq!(blank.kind, NavigationKind::Fallback);
	assert_eq!(empty_disambiguation.kind, NavigationKind::Fallback);
	assert!(empty_disambiguation.url.starts_with("/search?q=2%20bhk&qid="));
}

#[tokio::test]
async fn disambiguate_routes_to_disambiguation_page() {
	let response = ResolveResponse {
		candidates: Some(vec![
			candidate("loc_baner", "locality", "Baner", "/pune/baner"),
			candidate("prj_baner", "project", "Baner Heights", "/pune/projects/baner-heights"),
		]),
		..resolved("disambiguate", None)
	};
	let backend = Arc::new(ScriptedBackend::new().with_resolve("baner", Reply::ok(response)));
	let nav = service(&backend).orchestrate(query_from_pune("baner")).await;
	let qid = qid_of(&nav);

	assert_eq!(nav.kind, NavigationKind::Disambiguate);
	assert_eq!(
		nav.url,
		format!("/disambiguate?q=baner&qid={qid}&context_url=/pune&city_id=city_pune")
	);
}

#[tokio::test]
async fn serp_keeps_backend_params_and_adds_tracking() {
	let backend = Arc::new(ScriptedBackend::new().with_resolve(
		"baner",
		Reply::ok(resolved("serp", Some("/pune/search?type=locality&city_id=city_other"))),
	));
	let nav = service(&backend).orchestrate(query_from_pune("baner")).await;
	let qid = qid_of(&nav);

	assert_eq!(nav.kind, NavigationKind::Serp);
	assert_eq!(
		nav.url,
		format!("/pune/search?type=locality&city_id=city_other&qid={qid}&context_url=/pune")
	);
}

#[tokio::test]
async fn empty_query_goes_home_without_backend_calls() {
	let backend = Arc::new(ScriptedBackend::new());
	let nav = service(&backend).orchestrate(query_from_pune("   ")).await;

	assert_eq!(nav.kind, NavigationKind::Home);
	assert_eq!(nav.url, "/");
	assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn existing_query_id_is_reused() {
	let backend = Arc::new(
		ScriptedBackend::new()
			.with_resolve("baner", Reply::ok(resolved("redirect", Some("/pune/baner")))),
	);
	let qid = QueryId::from_param(Some("q-123"));
	let nav = service(&backend)
		.orchestrate(Target::Query(QueryTarget {
			q: "baner".to_string(),
			qid: qid.clone(),
			city_id: Some("city_explicit".to_string()),
			context_url: Some("/pune".to_string()),
		}))
		.await;

	assert_eq!(nav.qid, qid);
	assert_eq!(nav.url, "/pune/baner?qid=q-123&context_url=/pune&city_id=city_explicit");
	assert_eq!(backend.search_events()[0].query_id.as_str(), "q-123");
}

#[tokio::test(start_paused = true)]
async fn slow_or_failing_telemetry_does_not_hold_navigation() {
	let backend = Arc::new(
		ScriptedBackend::new()
			.with_resolve("baner", Reply::ok(resolved("redirect", Some("/pune/baner"))))
			.with_events(Reply::status(500).after(Duration::from_secs(3_600))),
	);
	let started = tokio::time::Instant::now();
	let nav = service(&backend).orchestrate(query_from_pune("baner")).await;

	assert_eq!(nav.kind, NavigationKind::Redirect);
	assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn direct_click_logs_and_skips_resolve() {
	let backend = Arc::new(ScriptedBackend::new());
	let nav = service(&backend)
		.orchestrate(Target::Direct(DirectTarget {
			url: "pune/baner".to_string(),
			entity_id: Some("loc_baner".to_string()),
			entity_type: Some("locality".to_string()),
			rank: Some(2),
			qid: QueryId::from_param(Some("q-9")),
			city_id: None,
			context_url: Some("/pune".to_string()),
		}))
		.await;
	let clicks = backend.click_events();

	assert_eq!(nav.kind, NavigationKind::Direct);
	assert_eq!(nav.url, "/pune/baner?qid=q-9&context_url=/pune&city_id=city_pune");
	assert_eq!(clicks.len(), 1);
	assert_eq!(clicks[0].rank, 2);
	assert_eq!(clicks[0].entity_id, "loc_baner");
	assert_eq!(clicks[0].query_id.as_str(), "q-9");
	assert!(!backend.calls().iter().any(|call| matches!(call, Call::Resolve(_))));
}

#[tokio::test]
async fn incomplete_click_is_not_logged_but_navigates() {
	let backend = Arc::new(ScriptedBackend::new());
	let nav = service(&backend)
		.orchestrate(Target::Direct(DirectTarget {
			url: "https://example.com/p?x=1#top".to_string(),
			entity_id: Some("loc_baner".to_string()),
			entity_type: None,
			rank: Some(1),
			qid: QueryId::from_param(Some("q-9")),
			city_id: None,
			context_url: None,
		}))
		.await;

	assert!(backend.calls().is_empty());
	assert_eq!(nav.url, "https://example.com/p?x=1&qid=q-9&context_url=/#top");
}

#[tokio::test]
async fn listing_links_route_through_go() {
	let backend = Arc::new(ScriptedBackend::new().with_search(
		"baner",
		Reply::ok(candidates("baner", vec![
			candidate("loc_baner", "locality", "Baner", "/pune/baner"),
			candidate("", "", "Untracked", ""),
		])),
	));
	let page = service(&backend)
		.listing(ListingRequest {
			q: Some(" baner ".to_string()),
			qid: Some("q-1".to_string()),
			city_id: None,
			context_url: Some("/pune".to_string()),
		})
		.await
		.expect("Listing failed.");

	assert_eq!(page.q, "baner");
	assert_eq!(page.results.len(), 1);
	assert_eq!(
		page.results[0].href,
		"/go?url=/pune/baner&entity_id=loc_baner&entity_type=locality&rank=1&qid=q-1&context_url=/pune&city_id=city_pune"
	);
}

#[tokio::test]
async fn listing_failure_is_inline() {
	let backend = Arc::new(ScriptedBackend::new().with_search("baner", Reply::status(500)));
	let page = service(&backend)
		.listing(ListingRequest { q: Some("baner".to_string()), ..Default::default() })
		.await
		.expect("Listing failed.");

	assert!(page.results.is_empty());
	assert!(page.error.is_some());
}

#[tokio::test]
async fn listing_requires_query() {
	let backend = Arc::new(ScriptedBackend::new());
	let err = service(&backend)
		.listing(ListingRequest::default())
		.await
		.expect_err("Expected a missing query error.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn disambiguation_page_reresolves() {
	let response = ResolveResponse {
		candidates: Some(vec![
			candidate("loc_baner", "locality", "Baner", "/pune/baner"),
			candidate("prj_baner", "project", "Baner Heights", "/pune/projects/baner-heights"),
		]),
		..resolved("disambiguate", None)
	};
	let backend = Arc::new(ScriptedBackend::new().with_resolve("baner", Reply::ok(response)));
	let page = service(&backend)
		.disambiguate(DisambiguateRequest {
			q: Some("baner".to_string()),
			qid: Some("q-1".to_string()),
			city_id: None,
			context_url: Some("/pune".to_string()),
		})
		.await
		.expect("Disambiguation failed.");

	assert_eq!(page.action, "disambiguate");
	assert_eq!(page.candidates.len(), 2);
	assert_eq!(page.candidates[1].rank, 2);
	assert_eq!(page.listing_url, "/search?q=baner&qid=q-1&context_url=/pune&city_id=city_pune");
	assert!(backend.search_events().is_empty());
}

#[tokio::test]
async fn disambiguation_page_reports_changed_action() {
	let response = ResolveResponse {
		matched: Some(candidate("loc_baner", "locality", "Baner", "/pune/baner")),
		..resolved("redirect", Some("/pune/baner"))
	};
	let backend = Arc::new(ScriptedBackend::new().with_resolve("baner", Reply::ok(response)));
	let page = service(&backend)
		.disambiguate(DisambiguateRequest { q: Some("baner".to_string()), ..Default::default() })
		.await
		.expect("Disambiguation failed.");

	assert_eq!(page.action, "redirect");
	assert_eq!(page.candidates.len(), 1);
	assert_eq!(page.candidates[0].id, "loc_baner");
}
