//! The rendering driver seam.
//!
//! Stages talk to a page only through [`RenderSession`]; the pipeline obtains
//! sessions from a [`Driver`] produced by a [`Launch`] implementation. The
//! production implementation lives in [`chrome`].

pub mod chrome;

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, WaitError};
use crate::wait::{wait_for_selector, WaitPolicy};

/// Starts a browser.
pub trait Launch: Send + Sync {
    type Driver: Driver;

    fn launch(&self) -> impl Future<Output = Result<Self::Driver, DriverError>> + Send;
}

/// A running browser that hands out isolated pages.
pub trait Driver: Send + Sync {
    type Session: RenderSession;

    fn open_session(&self) -> impl Future<Output = Result<Self::Session, DriverError>> + Send;

    /// Releases the browser. Must be called once every session is closed.
    fn shutdown(self) -> impl Future<Output = Result<(), DriverError>> + Send
    where
        Self: Sized;
}

/// One page.
///
/// All methods take `&self` so that a navigation wait and the click that
/// triggers it can run concurrently.
pub trait RenderSession: Send + Sync {
    /// Loads `url` and resolves once the document has loaded.
    fn navigate(&self, url: &str) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Replaces the value of the first element matching `selector` with `text`.
    fn fill(&self, selector: &str, text: &str)
        -> impl Future<Output = Result<(), DriverError>> + Send;

    fn click(&self, selector: &str) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Resolves when the next navigation of this page completes.
    fn wait_for_navigation(&self) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Number of elements currently matching `selector`.
    fn count(&self, selector: &str) -> impl Future<Output = Result<usize, DriverError>> + Send;

    /// Evaluates `fields` against every element matching `selector`, in
    /// document order.
    fn extract_all(
        &self,
        selector: &str,
        fields: &[FieldSpec],
    ) -> impl Future<Output = Result<Vec<RawRecord>, DriverError>> + Send;

    fn close(self) -> impl Future<Output = Result<(), DriverError>> + Send
    where
        Self: Sized;

    /// Waits until `selector` matches at least one element.
    fn wait_for(
        &self,
        selector: &str,
        policy: WaitPolicy,
    ) -> impl Future<Output = Result<(), WaitError>> + Send {
        wait_for_selector(self, selector, policy)
    }
}

/// What to read from a located element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Capture {
    /// Trimmed text content.
    Text,
    /// Value of the named attribute.
    Attribute(String),
    /// Resolved absolute `href`.
    Href,
}

/// One field of a [`RawRecord`]: where to find it relative to the record's
/// root element and what to capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    /// `None` reads from the root element itself.
    pub selector: Option<String>,
    pub capture: Capture,
}

impl FieldSpec {
    #[must_use]
    pub fn text(name: &'static str, selector: &str) -> Self {
        Self {
            name,
            selector: Some(selector.to_string()),
            capture: Capture::Text,
        }
    }

    #[must_use]
    pub fn attribute(name: &'static str, selector: &str, attribute: &str) -> Self {
        Self {
            name,
            selector: Some(selector.to_string()),
            capture: Capture::Attribute(attribute.to_string()),
        }
    }

    #[must_use]
    pub fn href(name: &'static str, selector: &str) -> Self {
        Self {
            name,
            selector: Some(selector.to_string()),
            capture: Capture::Href,
        }
    }
}

/// Field values captured from one element. A field is `None` when its
/// element or attribute was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, Option<String>>);

impl RawRecord {
    /// The captured value, or `None` if it was absent or blank.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Option::as_deref)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        self.0.insert(field.into(), value);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}
