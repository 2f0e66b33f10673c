//! Query filter: enter the query into the listing's search box and wait for
//! the filtered listing.

use menucrawl_core::SiteProfile;

use crate::driver::RenderSession;
use crate::error::{StageError, WaitError};
use crate::wait::WaitPolicy;

/// Applies `query` to the listing page `session` is showing.
///
/// # Errors
///
/// Returns [`StageError::QueryFilter`] if the filter panel does not mount,
/// the search box or submit control is missing, or the filtered listing
/// does not render in time.
pub async fn apply_query_filter<S: RenderSession>(
    session: &S,
    profile: &SiteProfile,
    query: &str,
) -> Result<(), StageError> {
    tracing::debug!(query, "applying query filter");

    run(session, profile, query)
        .await
        .map_err(|source| StageError::QueryFilter {
            query: query.to_string(),
            source,
        })?;

    tracing::debug!(query, "filtered listing rendered");
    Ok(())
}

async fn run<S: RenderSession>(
    session: &S,
    profile: &SiteProfile,
    query: &str,
) -> Result<(), WaitError> {
    let sel = &profile.selectors;
    let t = &profile.timeouts;
    let poll = t.poll_interval();

    session
        .wait_for(&sel.filters, WaitPolicy::new(t.filters(), poll))
        .await?;
    session.fill(&sel.search_input, query).await?;

    tokio::try_join!(
        session.wait_for(&sel.submit_button, WaitPolicy::new(t.listing(), poll)),
        async {
            session
                .click(&sel.submit_button)
                .await
                .map_err(WaitError::from)
        },
    )?;

    session
        .wait_for(&sel.listing_wrapper, WaitPolicy::new(t.listing(), poll))
        .await
}
