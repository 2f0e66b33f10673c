//! Scripted in-memory site used by the stage and pipeline tests.
//!
//! The fake walks the same page sequence as the real site (landing page,
//! autocomplete, listing, filtered listing, detail pages) and answers
//! selector queries according to which page is showing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use menucrawl_core::site::Selectors;
use menucrawl_core::SiteProfile;
use tokio::time::Instant;

use crate::driver::{Capture, Driver, FieldSpec, Launch, RawRecord, RenderSession};
use crate::error::DriverError;

/// How a detail page renders its menu.
#[derive(Debug, Clone)]
pub(crate) enum Menu {
    Items(Vec<RawRecord>),
    /// Items appear only after the page has been open this long.
    ItemsAfter(Duration, Vec<RawRecord>),
    Never,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub launched: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    open_now: AtomicUsize,
    pub max_open: AtomicUsize,
    pub detail_visits: AtomicUsize,
}

#[derive(Debug)]
pub(crate) struct FakeSite {
    pub landing_url: String,
    pub selectors: Selectors,
    pub suggestions_render: bool,
    pub filters_render: bool,
    pub fail_launch: bool,
    /// Checks that fail with an evaluation error after each page change,
    /// as when a script runs against a document being torn down.
    pub unsettled_checks: usize,
    pub cards: Vec<RawRecord>,
    pub menus: HashMap<String, Menu>,
    pub counters: Counters,
}

impl FakeSite {
    pub(crate) fn new(profile: &SiteProfile) -> Self {
        Self {
            landing_url: profile.landing_url.clone(),
            selectors: profile.selectors.clone(),
            suggestions_render: true,
            filters_render: true,
            fail_launch: false,
            unsettled_checks: 0,
            cards: Vec::new(),
            menus: HashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Adds a listing card whose detail page serves `menu`.
    pub(crate) fn with_restaurant(mut self, name: &str, rating_title: &str, menu: Menu) -> Self {
        let link = format!("https://fake.test/{}", name.to_lowercase().replace(' ', "-"));
        self.cards.push(card(name, Some(rating_title), Some(&link)));
        self.menus.insert(link, menu);
        self
    }

    pub(crate) fn with_card(mut self, record: RawRecord) -> Self {
        self.cards.push(record);
        self
    }

    pub(crate) fn launcher(self) -> FakeLauncher {
        FakeLauncher {
            site: Arc::new(self),
        }
    }

    pub(crate) fn count(c: &AtomicUsize) -> usize {
        c.load(Ordering::SeqCst)
    }
}

pub(crate) fn card(name: &str, rating_title: Option<&str>, link: Option<&str>) -> RawRecord {
    let mut record = RawRecord::default();
    record.insert("name", Some(name.to_string()));
    record.insert("rating", rating_title.map(str::to_string));
    record.insert("link", link.map(str::to_string));
    record
}

pub(crate) fn item(name: &str, price: &str) -> RawRecord {
    [("name", name), ("price", price)].into_iter().collect()
}

/// Menu of `n` items named `Dish 1..=n` priced `$10.00`, `$11.00`, ...
pub(crate) fn menu(n: usize) -> Menu {
    Menu::Items(
        (1..=n)
            .map(|i| item(&format!("Dish {i}"), &format!("${}.00", 9 + i)))
            .collect(),
    )
}

#[derive(Clone)]
pub(crate) struct FakeLauncher {
    pub site: Arc<FakeSite>,
}

impl Launch for FakeLauncher {
    type Driver = FakeDriver;

    async fn launch(&self) -> Result<FakeDriver, DriverError> {
        if self.site.fail_launch {
            return Err(DriverError::Browser("executable not found".to_string()));
        }
        self.site.counters.launched.fetch_add(1, Ordering::SeqCst);
        Ok(FakeDriver {
            site: Arc::clone(&self.site),
        })
    }
}

pub(crate) struct FakeDriver {
    site: Arc<FakeSite>,
}

impl Driver for FakeDriver {
    type Session = FakeSession;

    async fn open_session(&self) -> Result<FakeSession, DriverError> {
        let c = &self.site.counters;
        c.opened.fetch_add(1, Ordering::SeqCst);
        let now = c.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        c.max_open.fetch_max(now, Ordering::SeqCst);
        Ok(FakeSession {
            site: Arc::clone(&self.site),
            state: Mutex::new(PageState {
                view: View::Blank,
                arrived_at: Instant::now(),
                navigations: 0,
                unsettled: 0,
            }),
        })
    }

    async fn shutdown(self) -> Result<(), DriverError> {
        self.site.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum View {
    Blank,
    Landing,
    /// Location typed; suggestions may be showing.
    LocationTyped,
    Listing,
    Filtered,
    Detail(String),
}

struct PageState {
    view: View,
    arrived_at: Instant,
    navigations: u64,
    unsettled: usize,
}

pub(crate) struct FakeSession {
    site: Arc<FakeSite>,
    state: Mutex<PageState>,
}

impl FakeSession {
    fn state(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().unwrap()
    }

    fn go(&self, view: View) {
        let mut state = self.state();
        state.view = view;
        state.arrived_at = Instant::now();
        state.navigations += 1;
        state.unsettled = self.site.unsettled_checks;
    }

    fn matches(&self, selector: &str) -> usize {
        let s = &self.site.selectors;
        let state = self.state();
        let on = |flag: bool| usize::from(flag);
        match &state.view {
            View::Blank => 0,
            View::Landing => on(selector == s.location_input),
            View::LocationTyped => {
                if selector == s.location_input {
                    1
                } else if selector == s.suggestion || selector == s.suggestion_select {
                    on(self.site.suggestions_render)
                } else {
                    0
                }
            }
            View::Listing => {
                if selector == s.filters {
                    on(self.site.filters_render)
                } else {
                    on(selector == s.search_input || selector == s.submit_button)
                }
            }
            View::Filtered => {
                if selector == s.card {
                    self.site.cards.len()
                } else {
                    on(selector == s.filters
                        || selector == s.search_input
                        || selector == s.submit_button
                        || selector == s.listing_wrapper)
                }
            }
            View::Detail(url) => {
                if selector != s.menu_item {
                    return 0;
                }
                match self.site.menus.get(url) {
                    Some(Menu::Items(items)) => items.len(),
                    Some(Menu::ItemsAfter(delay, items)) if state.arrived_at.elapsed() >= *delay => {
                        items.len()
                    }
                    _ => 0,
                }
            }
        }
    }

    /// Which stored value `spec` reads off an element matching `root`.
    /// `None` when the spec points at an element or capture kind the fake
    /// page does not render.
    fn stored_field(&self, root: &str, spec: &FieldSpec) -> Option<&'static str> {
        let s = &self.site.selectors;
        let selector = spec.selector.as_deref()?;
        let layout = if root == s.card {
            vec![
                (s.card_name.as_str(), Capture::Text, "name"),
                (
                    s.card_rating.as_str(),
                    Capture::Attribute("title".to_string()),
                    "rating",
                ),
                (s.card_link.as_str(), Capture::Href, "link"),
            ]
        } else {
            vec![
                (s.item_name.as_str(), Capture::Text, "name"),
                (s.item_price.as_str(), Capture::Text, "price"),
            ]
        };
        layout
            .into_iter()
            .find(|(sel, capture, _)| *sel == selector && *capture == spec.capture)
            .map(|(_, _, stored)| stored)
    }

    fn project(&self, root: &str, records: &[RawRecord], fields: &[FieldSpec]) -> Vec<RawRecord> {
        records
            .iter()
            .map(|record| {
                let mut out = RawRecord::default();
                for spec in fields {
                    let value = self
                        .stored_field(root, spec)
                        .and_then(|stored| record.get(stored))
                        .map(str::to_string);
                    out.insert(spec.name, value);
                }
                out
            })
            .collect()
    }

    fn require(&self, selector: &str) -> Result<(), DriverError> {
        if self.matches(selector) == 0 {
            return Err(DriverError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        Ok(())
    }
}

impl RenderSession for FakeSession {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        if url == self.site.landing_url {
            self.go(View::Landing);
            return Ok(());
        }
        if self.site.menus.contains_key(url) {
            self.site.counters.detail_visits.fetch_add(1, Ordering::SeqCst);
            self.go(View::Detail(url.to_string()));
            return Ok(());
        }
        Err(DriverError::Browser(format!(
            "net::ERR_NAME_NOT_RESOLVED at {url}"
        )))
    }

    async fn fill(&self, selector: &str, _text: &str) -> Result<(), DriverError> {
        self.require(selector)?;
        let mut state = self.state();
        if state.view == View::Landing && selector == self.site.selectors.location_input {
            state.view = View::LocationTyped;
        }
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        self.require(selector)?;
        let view = self.state().view.clone();
        let s = &self.site.selectors;
        if view == View::LocationTyped && selector == s.suggestion_select {
            self.go(View::Listing);
        } else if view == View::Listing && selector == s.submit_button {
            self.state().view = View::Filtered;
        }
        Ok(())
    }

    async fn wait_for_navigation(&self) -> Result<(), DriverError> {
        let start = self.state().navigations;
        let waited = tokio::time::timeout(Duration::from_secs(30), async {
            loop {
                if self.state().navigations > start {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        waited.map_err(|_| DriverError::Timeout {
            operation: "wait_for_navigation",
        })
    }

    async fn count(&self, selector: &str) -> Result<usize, DriverError> {
        {
            let mut state = self.state();
            if state.unsettled > 0 {
                state.unsettled -= 1;
                return Err(DriverError::Evaluation(
                    "Execution context was destroyed".to_string(),
                ));
            }
        }
        Ok(self.matches(selector))
    }

    async fn extract_all(
        &self,
        selector: &str,
        fields: &[FieldSpec],
    ) -> Result<Vec<RawRecord>, DriverError> {
        let view = self.state().view.clone();
        let s = &self.site.selectors;
        let records = match view {
            View::Filtered if selector == s.card => self.project(selector, &self.site.cards, fields),
            View::Detail(url) if selector == s.menu_item && self.matches(selector) > 0 => {
                match self.site.menus.get(&url) {
                    Some(Menu::Items(items) | Menu::ItemsAfter(_, items)) => {
                        self.project(selector, items, fields)
                    }
                    _ => Vec::new(),
                }
            }
            _ => Vec::new(),
        };
        Ok(records)
    }

    async fn close(self) -> Result<(), DriverError> {
        let c = &self.site.counters;
        c.closed.fetch_add(1, Ordering::SeqCst);
        c.open_now.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
