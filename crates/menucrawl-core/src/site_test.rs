use std::path::Path;

use super::*;

#[test]
fn default_profile_is_valid() {
    validate_site_profile(&SiteProfile::default()).expect("default profile must validate");
}

#[test]
fn default_rating_regex_matches_card_title() {
    let re = SiteProfile::default().rating_regex().unwrap();
    let caps = re
        .captures("This restaurant has a 4.5 rating from 120 reviews")
        .expect("should match");
    assert_eq!(&caps[1], "4.5");
    assert_eq!(&caps[2], "120");
}

#[test]
fn partial_yaml_keeps_defaults() {
    let yaml = r"
selectors:
  card: .restaurant-card
timeouts:
  menu_items_ms: 15000
";
    let profile = parse_site_profile(yaml).expect("valid partial profile");
    assert_eq!(profile.selectors.card, ".restaurant-card");
    assert_eq!(profile.selectors.menu_item, "div.itemInfo");
    assert_eq!(profile.timeouts.menu_items_ms, 15_000);
    assert_eq!(profile.timeouts.suggestions_ms, 6_000);
    assert_eq!(profile.landing_url, "https://www.toasttab.com/local");
}

#[test]
fn unknown_keys_are_rejected() {
    let yaml = "selectors:\n  cards: .x\n";
    let err = parse_site_profile(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::ProfileFileParse(_)), "got: {err:?}");
}

#[test]
fn empty_selector_is_rejected() {
    let mut profile = SiteProfile::default();
    profile.selectors.item_price = "  ".to_string();
    let err = validate_site_profile(&profile).unwrap_err();
    assert!(err.to_string().contains("item_price"), "got: {err}");
}

#[test]
fn relative_landing_url_is_rejected() {
    let mut profile = SiteProfile::default();
    profile.landing_url = "/local".to_string();
    let err = validate_site_profile(&profile).unwrap_err();
    assert!(err.to_string().contains("landing_url"), "got: {err}");
}

#[test]
fn zero_timeout_is_rejected() {
    let mut profile = SiteProfile::default();
    profile.timeouts.filters_ms = 0;
    let err = validate_site_profile(&profile).unwrap_err();
    assert!(err.to_string().contains("filters_ms"), "got: {err}");
}

#[test]
fn poll_interval_longer_than_shortest_timeout_is_rejected() {
    let mut profile = SiteProfile::default();
    profile.timeouts.poll_interval_ms = 2_500;
    let err = validate_site_profile(&profile).unwrap_err();
    assert!(err.to_string().contains("poll_interval_ms"), "got: {err}");
}

#[test]
fn rating_pattern_needs_two_groups() {
    let mut profile = SiteProfile::default();
    profile.rating_pattern = r"(\d\.\d) rating".to_string();
    let err = validate_site_profile(&profile).unwrap_err();
    assert!(err.to_string().contains("2 capture groups"), "got: {err}");
}

#[test]
fn rating_pattern_must_compile() {
    let mut profile = SiteProfile::default();
    profile.rating_pattern = r"(\d".to_string();
    let err = validate_site_profile(&profile).unwrap_err();
    assert!(err.to_string().contains("does not compile"), "got: {err}");
}

#[test]
fn timeouts_convert_to_durations() {
    let t = Timeouts::default();
    assert_eq!(t.suggestions(), Duration::from_secs(6));
    assert_eq!(t.filters(), Duration::from_secs(2));
    assert_eq!(t.menu_items(), Duration::from_secs(10));
    assert_eq!(t.poll_interval(), Duration::from_millis(100));
}

#[test]
fn load_missing_file_reports_path() {
    let err = load_site_profile(Path::new("/nonexistent/menucrawl/site.yaml")).unwrap_err();
    assert!(
        matches!(err, ConfigError::ProfileFileIo { ref path, .. } if path.contains("site.yaml")),
        "got: {err:?}"
    );
}

#[test]
fn unset_profile_path_resolves_to_default() {
    assert_eq!(resolve_site_profile(None).unwrap(), SiteProfile::default());
}
