// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! URL helpers: redirect unwrapping, result validation and query redaction

use percent_encoding::percent_decode_str;
use url::Url;

/// Domain of the search engine; result links pointing back at it are rejected
pub const ENGINE_DOMAIN: &str = "duckduckgo.com";

/// Marker of the engine's outbound redirect wrapper
const REDIRECT_MARKER: &str = "/l/?uddg=";

/// Query parameters stripped by [`clean_url`]
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "msclkid",
];

/// Resolve a raw result href to its destination
///
/// Total: any irregularity (malformed escapes, non UTF-8 bytes) yields the
/// input unchanged, so a returned value equal to `href` does not mean the
/// href was a plain link.
///
/// - `//duckduckgo.com/l/?uddg=<encoded>&rut=...` returns the decoded target;
///   the same path on any other host is left alone
/// - `//host/path` gets an `https:` scheme
/// - anything else is returned as is
pub fn decode_redirect(href: &str) -> String {
    if let Some(pos) = href.find(REDIRECT_MARKER).filter(|_| is_engine_redirect(href)) {
        let encoded = &href[pos + REDIRECT_MARKER.len()..];
        let encoded = encoded
            .split(&['&', '#'][..])
            .next()
            .unwrap_or_default();

        return match strict_percent_decode(encoded) {
            Some(target) if !target.is_empty() => target,
            _ => href.to_string(),
        };
    }

    if href.starts_with("//") {
        return format!("https:{}", href);
    }

    href.to_string()
}

/// `/l/` path on the engine's own host (or a subdomain of it)
fn is_engine_redirect(href: &str) -> bool {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    let Ok(url) = Url::parse(&absolute) else {
        return false;
    };
    let on_engine = url.host_str().map_or(false, |host| {
        host == ENGINE_DOMAIN || host.ends_with(&format!(".{}", ENGINE_DOMAIN))
    });
    on_engine && url.path() == "/l/"
}

/// Percent-decode, rejecting truncated or non-hex escapes and invalid UTF-8
fn strict_percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .map_or(false, |pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(input)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Absolute http(s) URL with a host
pub fn is_valid_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Valid http(s) URL that does not point back at `engine_domain`
pub fn is_valid_result_url(candidate: &str, engine_domain: &str) -> bool {
    is_valid_http_url(candidate)
        && !candidate
            .to_lowercase()
            .contains(&engine_domain.to_lowercase())
}

/// Hostname of `url`, or an empty string when it does not parse
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Drop common tracking parameters; unparsable input is returned unchanged
pub fn clean_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let had_query = url.query().is_some();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !TRACKING_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else if had_query {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    url.to_string()
}

/// Join `path` onto `base` and set the `q` parameter
pub fn build_search_url(base: &str, path: &str, query: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?.join(path)?;
    url.query_pairs_mut().clear().append_pair("q", query);
    Ok(url)
}

/// URL with its query string and fragment removed, for logging
pub fn redact_query(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw
            .split(&['?', '#'][..])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
