//! Run orchestration: one browser, one listing page, then one page per
//! candidate, strictly in order.

use menucrawl_core::site::validate_site_profile;
use menucrawl_core::{CandidateRecord, ConfigError, PipelineResult, SearchRequest, SiteProfile};
use regex::Regex;

use crate::driver::{Driver, Launch, RenderSession};
use crate::error::{CandidateFault, StageError};
use crate::stages::{
    apply_query_filter, extract_candidates, extract_menu, resolve_location, CandidateOutcome,
};

/// A candidate dropped during detail extraction.
#[derive(Debug)]
pub struct SkippedCandidate {
    pub candidate_id: String,
    pub reason: CandidateFault,
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Entries for candidates whose menu was read, in candidate order.
    pub restaurants: PipelineResult,
    pub skipped: Vec<SkippedCandidate>,
}

impl PipelineReport {
    /// Splits outcomes into results and skips, preserving order.
    #[must_use]
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = CandidateOutcome>) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                CandidateOutcome::Extracted(entry) => report.restaurants.push(entry),
                CandidateOutcome::Skipped {
                    candidate_id,
                    reason,
                } => report.skipped.push(SkippedCandidate {
                    candidate_id,
                    reason,
                }),
            }
        }
        report
    }

    #[must_use]
    pub fn into_restaurants(self) -> PipelineResult {
        self.restaurants
    }
}

/// The live extraction pipeline.
pub struct MenuPipeline<L> {
    launcher: L,
    profile: SiteProfile,
    rating_pattern: Regex,
}

impl<L: Launch> MenuPipeline<L> {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `profile` is invalid.
    pub fn new(launcher: L, profile: SiteProfile) -> Result<Self, ConfigError> {
        validate_site_profile(&profile)?;
        let rating_pattern = profile.rating_regex()?;
        Ok(Self {
            launcher,
            profile,
            rating_pattern,
        })
    }

    #[must_use]
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Runs every stage for `request`.
    ///
    /// The browser is shut down before this returns, on success and failure
    /// alike.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if the browser cannot start or any stage before
    /// detail extraction fails. Detail faults never surface here; they are
    /// listed in [`PipelineReport::skipped`].
    pub async fn run(&self, request: &SearchRequest) -> Result<PipelineReport, StageError> {
        tracing::info!(
            location = request.location(),
            query = request.query(),
            max_candidates = request.max_candidates(),
            max_items = request.max_items_per_candidate(),
            "starting pipeline run"
        );

        let driver = self.launcher.launch().await.map_err(StageError::Launch)?;
        let result = self.run_with(&driver, request).await;
        if let Err(e) = driver.shutdown().await {
            tracing::warn!(error = %e, "browser shutdown failed");
        }

        match &result {
            Ok(report) => tracing::info!(
                extracted = report.restaurants.len(),
                skipped = report.skipped.len(),
                "pipeline run finished"
            ),
            Err(e) => tracing::error!(error = %e, "pipeline run failed"),
        }
        result
    }

    async fn run_with(
        &self,
        driver: &L::Driver,
        request: &SearchRequest,
    ) -> Result<PipelineReport, StageError> {
        let session = driver
            .open_session()
            .await
            .map_err(|source| StageError::Driver {
                stage: "open listing page",
                source,
            })?;
        let candidates = self.discover(&session, request).await;
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "failed to close listing page");
        }
        let candidates = candidates?;

        let mut outcomes = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            outcomes.push(
                extract_menu(
                    driver,
                    &self.profile,
                    candidate,
                    request.max_items_per_candidate(),
                )
                .await,
            );
        }

        Ok(PipelineReport::from_outcomes(outcomes))
    }

    async fn discover<S: RenderSession>(
        &self,
        session: &S,
        request: &SearchRequest,
    ) -> Result<Vec<CandidateRecord>, StageError> {
        resolve_location(session, &self.profile, request.location()).await?;
        apply_query_filter(session, &self.profile, request.query()).await?;
        extract_candidates(session, &self.profile, &self.rating_pattern, request).await
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
