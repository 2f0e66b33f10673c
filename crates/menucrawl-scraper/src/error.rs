use thiserror::Error;

/// Failures reported by a rendering driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser error: {0}")]
    Browser(String),

    #[error("DevTools endpoint discovery failed for {url}: {reason}")]
    Discovery { url: String, reason: String },

    #[error("no element matches selector {selector}")]
    ElementNotFound { selector: String },

    #[error("page evaluation failed: {0}")]
    Evaluation(String),

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },
}

impl DriverError {
    /// Whether the same call may succeed on retry, as when a script runs
    /// while the page is swapping documents.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Browser(_) | Self::Evaluation(_))
    }
}

/// Outcome of a wait that did not succeed.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("{condition} not found within {timeout_ms} ms")]
    ElementNotFoundWithinTimeout { condition: String, timeout_ms: u64 },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// A fault that aborts the whole run.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("failed to start browser: {0}")]
    Launch(#[source] DriverError),

    #[error("location resolution failed for \"{location}\": {source}")]
    LocationResolution {
        location: String,
        #[source]
        source: WaitError,
    },

    #[error("query filter failed for \"{query}\": {source}")]
    QueryFilter {
        query: String,
        #[source]
        source: WaitError,
    },

    #[error("listing card {card_index} is missing required field '{field}'")]
    ListingExtraction {
        card_index: usize,
        field: &'static str,
    },

    #[error("browser driver failed during {stage}: {source}")]
    Driver {
        stage: &'static str,
        #[source]
        source: DriverError,
    },
}

/// Why a single candidate was dropped. Never aborts the run.
#[derive(Debug, Error)]
pub enum CandidateFault {
    #[error("could not open a page: {0}")]
    Session(#[source] DriverError),

    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: DriverError,
    },

    #[error("no menu items rendered: {0}")]
    NoItems(#[source] WaitError),

    #[error("menu extraction failed: {0}")]
    Extraction(#[source] DriverError),

    #[error("menu item {item_index} is missing '{field}'")]
    MissingField {
        item_index: usize,
        field: &'static str,
    },

    #[error("menu item {item_index} has unparseable price \"{raw}\"")]
    InvalidPrice { item_index: usize, raw: String },
}
