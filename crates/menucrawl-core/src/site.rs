//! Selectors, timeouts, and patterns describing the target restaurant site.
//!
//! Everything the pipeline needs to know about the page structure lives
//! here so a markup change on the site is a YAML edit, not a rebuild. The
//! [`Default`] profile matches the site as last observed.

use std::path::Path;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteProfile {
    /// Page with the location autocomplete input.
    pub landing_url: String,
    pub selectors: Selectors,
    pub timeouts: Timeouts,
    /// Regex applied to the rating element's `title`. Capture 1 is the
    /// average rating, capture 2 the review count.
    pub rating_pattern: String,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            landing_url: "https://www.toasttab.com/local".to_string(),
            selectors: Selectors::default(),
            timeouts: Timeouts::default(),
            rating_pattern: r"(\d+(?:\.\d+)?) rating from (\d+) reviews".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Selectors {
    pub location_input: String,
    /// Any rendered autocomplete suggestion.
    pub suggestion: String,
    /// The suggestion that gets clicked.
    pub suggestion_select: String,
    pub filters: String,
    pub search_input: String,
    pub submit_button: String,
    pub listing_wrapper: String,
    pub card: String,
    /// Relative to `card`.
    pub card_name: String,
    /// Relative to `card`; its `title` attribute carries the rating text.
    pub card_rating: String,
    /// Relative to `card`.
    pub card_link: String,
    pub menu_item: String,
    /// Relative to `menu_item`.
    pub item_name: String,
    /// Relative to `menu_item`.
    pub item_price: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            location_input: r#"input[type="text"]"#.to_string(),
            suggestion: ".prediction".to_string(),
            suggestion_select: r#"button.prediction[tabindex="0"]"#.to_string(),
            filters: ".filters".to_string(),
            search_input: r#"input[aria-label="Search"]"#.to_string(),
            submit_button: "div.submit-button".to_string(),
            listing_wrapper: ".rx-card-wrapper".to_string(),
            card: ".rx-card-container".to_string(),
            card_name: "h3.rx-name".to_string(),
            card_rating: "div.avg-rating".to_string(),
            card_link: "a".to_string(),
            menu_item: "div.itemInfo".to_string(),
            item_name: "div.itemHeader > span.headerText".to_string(),
            item_price: "div.priceAvailability > span.price".to_string(),
        }
    }
}

impl Selectors {
    fn named(&self) -> [(&'static str, &str); 14] {
        [
            ("location_input", self.location_input.as_str()),
            ("suggestion", self.suggestion.as_str()),
            ("suggestion_select", self.suggestion_select.as_str()),
            ("filters", self.filters.as_str()),
            ("search_input", self.search_input.as_str()),
            ("submit_button", self.submit_button.as_str()),
            ("listing_wrapper", self.listing_wrapper.as_str()),
            ("card", self.card.as_str()),
            ("card_name", self.card_name.as_str()),
            ("card_rating", self.card_rating.as_str()),
            ("card_link", self.card_link.as_str()),
            ("menu_item", self.menu_item.as_str()),
            ("item_name", self.item_name.as_str()),
            ("item_price", self.item_price.as_str()),
        ]
    }
}

/// Per-wait limits in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    pub landing_ms: u64,
    pub suggestions_ms: u64,
    pub filters_ms: u64,
    pub listing_ms: u64,
    pub menu_items_ms: u64,
    /// How often a pending wait re-checks the page.
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            landing_ms: 30_000,
            suggestions_ms: 6_000,
            filters_ms: 2_000,
            listing_ms: 30_000,
            menu_items_ms: 10_000,
            poll_interval_ms: 100,
        }
    }
}

impl Timeouts {
    #[must_use]
    pub fn landing(&self) -> Duration {
        Duration::from_millis(self.landing_ms)
    }

    #[must_use]
    pub fn suggestions(&self) -> Duration {
        Duration::from_millis(self.suggestions_ms)
    }

    #[must_use]
    pub fn filters(&self) -> Duration {
        Duration::from_millis(self.filters_ms)
    }

    #[must_use]
    pub fn listing(&self) -> Duration {
        Duration::from_millis(self.listing_ms)
    }

    #[must_use]
    pub fn menu_items(&self) -> Duration {
        Duration::from_millis(self.menu_items_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn named(&self) -> [(&'static str, u64); 5] {
        [
            ("landing_ms", self.landing_ms),
            ("suggestions_ms", self.suggestions_ms),
            ("filters_ms", self.filters_ms),
            ("listing_ms", self.listing_ms),
            ("menu_items_ms", self.menu_items_ms),
        ]
    }
}

impl SiteProfile {
    /// Compiles [`Self::rating_pattern`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the pattern does not compile or
    /// does not have exactly two capture groups.
    pub fn rating_regex(&self) -> Result<Regex, ConfigError> {
        let re = Regex::new(&self.rating_pattern).map_err(|e| {
            ConfigError::Validation(format!("rating_pattern does not compile: {e}"))
        })?;
        // captures_len counts the implicit whole-match group.
        if re.captures_len() != 3 {
            return Err(ConfigError::Validation(format!(
                "rating_pattern must have exactly 2 capture groups, found {}",
                re.captures_len() - 1
            )));
        }
        Ok(re)
    }
}

/// Load and validate a site profile from a YAML file. Keys omitted from the
/// file keep their default values.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_site_profile(path: &Path) -> Result<SiteProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_site_profile(&content)
}

/// Loads the profile at `path`, or the default profile when no path is set.
///
/// # Errors
///
/// See [`load_site_profile`].
pub fn resolve_site_profile(path: Option<&Path>) -> Result<SiteProfile, ConfigError> {
    match path {
        Some(path) => load_site_profile(path),
        None => Ok(SiteProfile::default()),
    }
}

/// Parse and validate a site profile from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_site_profile(yaml: &str) -> Result<SiteProfile, ConfigError> {
    let profile: SiteProfile = serde_yaml::from_str(yaml)?;
    validate_site_profile(&profile)?;
    Ok(profile)
}

/// Checks the invariants the pipeline relies on.
///
/// # Errors
///
/// Returns `ConfigError::Validation` describing the first violation found.
pub fn validate_site_profile(profile: &SiteProfile) -> Result<(), ConfigError> {
    let landing = profile.landing_url.trim();
    if !(landing.starts_with("http://") || landing.starts_with("https://")) {
        return Err(ConfigError::Validation(format!(
            "landing_url '{}' must be an absolute http(s) URL",
            profile.landing_url
        )));
    }

    for (name, selector) in profile.selectors.named() {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{name}' must be non-empty"
            )));
        }
    }

    let timeouts = &profile.timeouts;
    for (name, ms) in timeouts.named() {
        if ms == 0 {
            return Err(ConfigError::Validation(format!(
                "timeout '{name}' must be greater than zero"
            )));
        }
    }

    let shortest = timeouts
        .named()
        .iter()
        .map(|(_, ms)| *ms)
        .min()
        .unwrap_or(0);
    if timeouts.poll_interval_ms == 0 || timeouts.poll_interval_ms > shortest {
        return Err(ConfigError::Validation(format!(
            "poll_interval_ms must be between 1 and the shortest timeout ({shortest} ms), got {}",
            timeouts.poll_interval_ms
        )));
    }

    profile.rating_regex()?;

    Ok(())
}

#[cfg(test)]
#[path = "site_test.rs"]
mod tests;
