use wayfind_domain::{
	ContextRules, Scope,
	context::resolve_context,
	path::extract_path_candidate,
	redirect::merge,
};

fn rules() -> ContextRules {
	ContextRules::default()
}

#[test]
fn explicit_city_wins_over_inference() {
	assert_eq!(
		resolve_context(&rules(), Some("explicit_city"), "/pune/buy"),
		Some("explicit_city".to_string())
	);
}

#[test]
fn infers_city_from_first_segment() {
	assert_eq!(resolve_context(&rules(), None, "/pune/buy"), Some("city_pune".to_string()));
	assert_eq!(resolve_context(&rules(), Some("  "), "/pune"), Some("city_pune".to_string()));
}

#[test]
fn reserved_routes_do_not_infer_city() {
	assert_eq!(resolve_context(&rules(), None, "/search?q=x"), None);
	assert_eq!(resolve_context(&rules(), None, "/disambiguate?q=pune"), None);
}

#[test]
fn section_keyword_takes_slug_from_second_segment() {
	assert_eq!(
		resolve_context(&rules(), None, "/property-rates/mumbai"),
		Some("city_mumbai".to_string())
	);
	assert_eq!(resolve_context(&rules(), None, "/projects"), None);
}

#[test]
fn unknown_slug_is_absent_scope() {
	assert_eq!(resolve_context(&rules(), None, "/atlantis/buy"), None);
	assert_eq!(resolve_context(&rules(), None, "/"), None);
	assert_eq!(resolve_context(&rules(), None, ""), None);
}

#[test]
fn custom_slug_table_is_honoured() {
	let mut cfg = wayfind_config::Context::default();

	cfg.cities.insert("goa".to_string(), "city_goa".to_string());

	let rules = ContextRules::from_config(&cfg);

	assert_eq!(resolve_context(&rules, None, "/goa/rent"), Some("city_goa".to_string()));
}

#[test]
fn scope_defaults_context_to_root() {
	let scope = Scope::resolve(&rules(), None, None);

	assert_eq!(scope, Scope { city_id: None, context_url: "/".to_string() });
}

#[test]
fn merge_adds_missing_params_in_order() {
	let merged = merge(
		"/pune/baner",
		&[("qid", Some("abc")), ("context_url", Some("/pune")), ("city_id", Some("city_pune"))],
	);

	assert_eq!(merged, "/pune/baner?qid=abc&context_url=/pune&city_id=city_pune");
}

#[test]
fn merge_keeps_existing_params() {
	let merged = merge("/x?city_id=a", &[("city_id", Some("b"))]);

	assert_eq!(merged, "/x?city_id=a");
}

#[test]
fn merge_is_idempotent() {
	let extras = [("qid", Some("q1")), ("city_id", Some("city_pune")), ("context_url", None)];
	let cases = ["/pune/baner", "/x?city_id=a", "https://example.com/a?b=1#frag", "/y?", "rel/path"];

	for base in cases {
		let once = merge(base, &extras);

		assert_eq!(merge(&once, &extras), once, "merge must be idempotent for {base}");
	}
}

#[test]
fn merge_skips_empty_extras() {
	assert_eq!(merge("/x", &[("qid", Some("")), ("city_id", None)]), "/x");
}

#[test]
fn merge_preserves_absolute_urls_and_fragments() {
	let merged = merge("https://Example.com/a/b?z=1#section", &[("qid", Some("q1"))]);

	assert_eq!(merged, "https://Example.com/a/b?z=1&qid=q1#section");
}

#[test]
fn merge_enforces_leading_slash_on_local_paths() {
	assert_eq!(merge("pune/baner", &[("qid", Some("q1"))]), "/pune/baner?qid=q1");
}

#[test]
fn extracts_paths_from_urls_and_slugs() {
	assert_eq!(
		extract_path_candidate("https://example.com/pune/baner?x=1"),
		Some("/pune/baner".to_string())
	);
	assert_eq!(extract_path_candidate("squareyards.com/pune/baner"), Some("/pune/baner".to_string()));
	assert_eq!(extract_path_candidate("pune//baner/"), Some("/pune/baner".to_string()));
	assert_eq!(extract_path_candidate("/pune%20west"), None);
	assert_eq!(extract_path_candidate("2 bhk baner"), None);
	assert_eq!(extract_path_candidate("/"), None);
}
