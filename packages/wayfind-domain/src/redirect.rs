use std::collections::HashSet;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::form_urlencoded;

/// Characters escaped in query keys and values. `/` and `:` stay readable.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'&')
	.add(b'+')
	.add(b'<')
	.add(b'=')
	.add(b'>')
	.add(b'[')
	.add(b'\\')
	.add(b']')
	.add(b'^')
	.add(b'`')
	.add(b'{')
	.add(b'|')
	.add(b'}');
/// Characters escaped anywhere in a destination so it survives as a `Location` header value.
const DESTINATION: &AsciiSet = &CONTROLS.add(b' ');

/// Adds each non-empty extra to the query string unless the key is already present.
///
/// Existing parameters win, so merging the same extras twice is a no-op. Relative URLs stay
/// relative and absolute URLs keep their structure. A destination without a scheme always gets
/// exactly one leading slash. Control characters, spaces and non-ASCII bytes are
/// percent-encoded; existing escapes are kept as they are.
pub fn merge(base_url: &str, extras: &[(&str, Option<&str>)]) -> String {
	let destination = normalize_destination(base_url);
	let (head, fragment) = match destination.split_once('#') {
		Some((head, fragment)) => (head, Some(fragment)),
		None => (destination.as_str(), None),
	};
	let (path, query) = match head.split_once('?') {
		Some((path, query)) => (path, Some(query)),
		None => (head, None),
	};
	let mut present: HashSet<String> = query
		.map(|query| form_urlencoded::parse(query.as_bytes()).map(|(key, _)| key.into_owned()).collect())
		.unwrap_or_default();
	let mut appended = Vec::new();

	for (key, value) in extras {
		let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
			continue;
		};

		if key.is_empty() || !present.insert((*key).to_string()) {
			continue;
		}

		appended.push(format!(
			"{}={}",
			utf8_percent_encode(key, QUERY_COMPONENT),
			utf8_percent_encode(value, QUERY_COMPONENT)
		));
	}

	if appended.is_empty() {
		return destination;
	}

	let mut out = String::with_capacity(destination.len() + 64);

	out.push_str(path);
	out.push('?');

	if let Some(query) = query.filter(|query| !query.is_empty()) {
		out.push_str(query);

		if !query.ends_with('&') {
			out.push('&');
		}
	}

	out.push_str(&appended.join("&"));

	if let Some(fragment) = fragment {
		out.push('#');
		out.push_str(fragment);
	}

	out
}

pub fn has_scheme(url: &str) -> bool {
	let Some((scheme, _)) = url.split_once("://") else {
		return false;
	};
	let mut chars = scheme.chars();

	chars.next().is_some_and(|first| first.is_ascii_alphabetic())
		&& chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn normalize_destination(base_url: &str) -> String {
	let trimmed = base_url.trim();

	if trimmed.is_empty() {
		return "/".to_string();
	}
	if has_scheme(trimmed) {
		return utf8_percent_encode(trimmed, DESTINATION).to_string();
	}

	format!("/{}", utf8_percent_encode(trimmed.trim_start_matches(['/', '\\']), DESTINATION))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detects_schemes() {
		assert!(has_scheme("https://example.com/x"));
		assert!(has_scheme("git+ssh://host/repo"));
		assert!(!has_scheme("/pune/baner"));
		assert!(!has_scheme("javascript:alert(1)"));
		assert!(!has_scheme("/go?url=https://example.com"));
	}

	#[test]
	fn protocol_relative_destinations_become_local() {
		assert_eq!(merge("//evil.example/x", &[]), "/evil.example/x");
		assert_eq!(merge("pune/baner", &[]), "/pune/baner");
		assert_eq!(merge("", &[]), "/");
	}

	#[test]
	fn escapes_reserved_characters_in_values() {
		let merged = merge("/search", &[("q", Some("2 bhk & more"))]);

		assert_eq!(merged, "/search?q=2%20bhk%20%26%20more");
	}

	#[test]
	fn encodes_control_characters_in_destinations() {
		assert_eq!(merge("/pune\nbaner", &[("qid", Some("q-1"))]), "/pune%0Abaner?qid=q-1");
		assert_eq!(merge("https://example.com/ba\rner#top", &[]), "https://example.com/ba%0Drner#top");
		assert_eq!(merge("/pune/ba%0Dner", &[]), "/pune/ba%0Dner");
		assert_eq!(merge("/pune/kharadi pune", &[]), "/pune/kharadi%20pune");
	}
}
