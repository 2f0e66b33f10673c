//! Location autocomplete: type the location, wait for suggestions, pick the
//! first one and ride the navigation it triggers.

use menucrawl_core::SiteProfile;

use crate::driver::RenderSession;
use crate::error::{StageError, WaitError};
use crate::wait::WaitPolicy;

/// Drives `session` from the landing page to the location's listing page.
///
/// # Errors
///
/// Returns [`StageError::LocationResolution`] if the landing page does not
/// load, the input never renders, no suggestion appears in time, or the
/// selection does not navigate.
pub async fn resolve_location<S: RenderSession>(
    session: &S,
    profile: &SiteProfile,
    location: &str,
) -> Result<(), StageError> {
    tracing::debug!(location, url = %profile.landing_url, "resolving location");

    run(session, profile, location)
        .await
        .map_err(|source| StageError::LocationResolution {
            location: location.to_string(),
            source,
        })?;

    tracing::debug!(location, "location resolved");
    Ok(())
}

async fn run<S: RenderSession>(
    session: &S,
    profile: &SiteProfile,
    location: &str,
) -> Result<(), WaitError> {
    let sel = &profile.selectors;
    let t = &profile.timeouts;
    let poll = t.poll_interval();

    session.navigate(&profile.landing_url).await?;
    session
        .wait_for(&sel.location_input, WaitPolicy::new(t.landing(), poll))
        .await?;
    session.fill(&sel.location_input, location).await?;
    session
        .wait_for(&sel.suggestion, WaitPolicy::new(t.suggestions(), poll))
        .await?;

    // Start listening before the click so a fast navigation is not missed.
    tokio::try_join!(
        session.wait_for_navigation(),
        session.click(&sel.suggestion_select),
    )?;
    Ok(())
}
