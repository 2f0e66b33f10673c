//! Search request construction and the defaulting rules shared by every
//! trigger adapter.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATION: &str = "Palo Alto, CA";
pub const DEFAULT_QUERY: &str = "chinese";
pub const DEFAULT_RESTAURANT_COUNT: usize = 5;
pub const DEFAULT_ITEM_COUNT: usize = 5;

/// Raw, untrusted trigger parameters as they arrive on a query string.
///
/// Counts stay strings here: the defaulting rules (see [`parse_count`]) need
/// to see the raw text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub location: Option<String>,
    pub query: Option<String>,
    /// Legacy alias for `query`.
    pub usermsg: Option<String>,
    pub n_restaurants: Option<String>,
    pub n_items: Option<String>,
}

/// Immutable input for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    location: String,
    query: String,
    max_candidates: usize,
    max_items_per_candidate: usize,
}

impl SearchRequest {
    /// Builds a request, substituting defaults for blank strings and zero
    /// counts.
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        query: impl Into<String>,
        max_candidates: usize,
        max_items_per_candidate: usize,
    ) -> Self {
        Self {
            location: non_blank_or(location.into(), DEFAULT_LOCATION),
            query: non_blank_or(query.into(), DEFAULT_QUERY),
            max_candidates: positive_or(max_candidates, DEFAULT_RESTAURANT_COUNT),
            max_items_per_candidate: positive_or(max_items_per_candidate, DEFAULT_ITEM_COUNT),
        }
    }

    /// Applies the trigger defaulting rules to raw parameters.
    ///
    /// `query` wins over `usermsg` when both are present and non-blank.
    #[must_use]
    pub fn from_params(params: &SearchParams) -> Self {
        let query = [params.query.as_deref(), params.usermsg.as_deref()]
            .into_iter()
            .flatten()
            .find(|q| !q.trim().is_empty())
            .unwrap_or(DEFAULT_QUERY);

        Self::new(
            params.location.as_deref().unwrap_or(DEFAULT_LOCATION),
            query,
            parse_count(params.n_restaurants.as_deref(), DEFAULT_RESTAURANT_COUNT),
            parse_count(params.n_items.as_deref(), DEFAULT_ITEM_COUNT),
        )
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    #[must_use]
    pub fn max_items_per_candidate(&self) -> usize {
        self.max_items_per_candidate
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::new(
            DEFAULT_LOCATION,
            DEFAULT_QUERY,
            DEFAULT_RESTAURANT_COUNT,
            DEFAULT_ITEM_COUNT,
        )
    }
}

/// Parses a count the way a JavaScript `parseInt(raw, 10) || default` would:
/// leading whitespace and an optional sign are skipped, the leading run of
/// digits is read, and anything after it is ignored. A missing, non-numeric,
/// or non-positive value yields `default`.
#[must_use]
pub fn parse_count(raw: Option<&str>, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = unsigned
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];

    if negative || digits.is_empty() {
        return default;
    }

    // Overflow means "more than the page can ever hold".
    match digits.parse::<usize>() {
        Ok(0) => default,
        Ok(n) => n,
        Err(_) => usize::MAX,
    }
}

fn non_blank_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn positive_or(value: usize, default: usize) -> usize {
    if value == 0 {
        default
    } else {
        value
    }
}
