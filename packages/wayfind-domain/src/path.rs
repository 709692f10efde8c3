use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

static DOMAIN_PREFIX: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9.-]+\.[a-z]{2,}/").ok());
static PATH_ALLOWED: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^/[A-Za-z0-9._~:/@!$&'()*+,;=%-]*$").ok());

/// True when the text reads as a URL or path rather than search terms.
pub fn looks_like_path(raw: &str) -> bool {
	let s = raw.trim();

	if s.is_empty() {
		return false;
	}
	if s.starts_with("http://") || s.starts_with("https://") || s.starts_with('/') {
		return true;
	}
	if is_match(&DOMAIN_PREFIX, s) {
		return true;
	}

	s.contains('/') && !s.contains(char::is_whitespace)
}

/// Pulls a normalized path such as `/pune/baner` out of a full URL, an absolute path, a
/// `domain.tld/path` string, or a bare `pune/baner` slug path.
///
/// The result has no query string or fragment, no repeated or trailing slashes, and is never
/// the bare root.
pub fn extract_path_candidate(raw: &str) -> Option<String> {
	let s = raw.trim();

	if s.is_empty() {
		return None;
	}

	let mut path = if s.starts_with("http://") || s.starts_with("https://") {
		Url::parse(s).ok()?.path().to_string()
	} else {
		s.split(['?', '#']).next().unwrap_or_default().to_string()
	};

	if !path.starts_with('/') && is_match(&DOMAIN_PREFIX, &path) {
		path = match path.split_once('/') {
			Some((_, rest)) => format!("/{rest}"),
			None => return None,
		};
	}
	if !path.starts_with('/') {
		if path.contains(' ') {
			return None;
		}

		path.insert(0, '/');
	}

	let decoded = percent_decode_str(&path).decode_utf8_lossy().into_owned();
	let mut path = collapse_slashes(&decoded);

	if path.len() > 1 && path.ends_with('/') {
		path.pop();
	}
	if !is_match(&PATH_ALLOWED, &path) || path == "/" {
		return None;
	}

	Some(path)
}

fn is_match(re: &LazyLock<Option<Regex>>, text: &str) -> bool {
	re.as_ref().is_some_and(|re| re.is_match(text))
}

fn collapse_slashes(path: &str) -> String {
	let mut out = String::with_capacity(path.len());

	for c in path.chars() {
		if c == '/' && out.ends_with('/') {
			continue;
		}

		out.push(c);
	}

	out
}
