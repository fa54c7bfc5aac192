//! Return-URL handling for the checkout round trip.
//!
//! The checkout provider sends the subscriber back with marker query
//! parameters (`success=true&session_id=...` or `canceled=true`). These
//! helpers read the markers and strip them so a resumed URL cannot replay
//! the outcome.

/// Outcome parameters found on a return URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnParams {
    /// Provider reported success and supplied the session id to verify.
    Success { session_id: String },
    /// Subscriber backed out of the hosted checkout page.
    Canceled,
    /// No outcome markers present.
    Absent,
}

/// Read the checkout outcome markers from a raw URL.
///
/// Cancellation wins over a malformed success pair, and `success=true`
/// without a session id counts as no outcome at all since there is nothing
/// to verify.
pub fn parse_return(raw: &str) -> ReturnParams {
    let query = query_of(raw);
    let mut success = false;
    let mut canceled = false;
    let mut session_id: Option<String> = None;

    for (key, value) in pairs(query) {
        match key {
            "canceled" if value == "true" => canceled = true,
            "success" if value == "true" => success = true,
            "session_id" if !value.is_empty() => session_id = Some(value.to_string()),
            _ => {}
        }
    }

    if canceled {
        return ReturnParams::Canceled;
    }
    match (success, session_id) {
        (true, Some(session_id)) => ReturnParams::Success { session_id },
        _ => ReturnParams::Absent,
    }
}

/// Remove the outcome markers from a URL, preserving everything else.
///
/// Other query parameters and any fragment survive; the `?` is dropped when
/// no parameters remain.
pub fn strip_return_params(raw: &str) -> String {
    let (without_fragment, fragment) = match raw.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (raw, None),
    };
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, query),
        None => (without_fragment, ""),
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or(pair);
            !matches!(key, "success" | "canceled" | "session_id")
        })
        .collect();

    let mut out = base.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(frag) = fragment {
        out.push('#');
        out.push_str(frag);
    }
    out
}

fn query_of(raw: &str) -> &str {
    let without_fragment = raw.split('#').next().unwrap_or(raw);
    match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None => "",
    }
}

fn pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query.split('&').filter(|p| !p.is_empty()).map(|pair| {
        match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        }
    })
}
