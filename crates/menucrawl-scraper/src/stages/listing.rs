//! Listing extraction: turn the filtered listing's cards into candidates.

use menucrawl_core::{CandidateRecord, SearchRequest, SiteProfile};
use regex::Regex;

use crate::driver::{FieldSpec, RawRecord, RenderSession};
use crate::error::StageError;
use crate::parse::parse_rating;

const NAME: &str = "name";
const RATING: &str = "rating";
const LINK: &str = "link";

/// Reads every card on the filtered listing and returns the first
/// `request.max_candidates()` of them.
///
/// # Errors
///
/// Returns [`StageError::ListingExtraction`] if any card lacks a name or a
/// detail link, or [`StageError::Driver`] if the page cannot be read.
pub async fn extract_candidates<S: RenderSession>(
    session: &S,
    profile: &SiteProfile,
    rating_pattern: &Regex,
    request: &SearchRequest,
) -> Result<Vec<CandidateRecord>, StageError> {
    let sel = &profile.selectors;
    let fields = [
        FieldSpec::text(NAME, &sel.card_name),
        FieldSpec::attribute(RATING, &sel.card_rating, "title"),
        FieldSpec::href(LINK, &sel.card_link),
    ];

    let cards = session
        .extract_all(&sel.card, &fields)
        .await
        .map_err(|source| StageError::Driver {
            stage: "listing extraction",
            source,
        })?;

    let found = cards.len();
    let candidates = build_candidates(&cards, rating_pattern, request)?;
    tracing::info!(
        found,
        kept = candidates.len(),
        requested = request.max_candidates(),
        "listing extracted"
    );
    Ok(candidates)
}

/// Validates every card, numbers them from 1 in page order, then truncates.
///
/// Ids are assigned before truncation, so they always reflect page position.
pub(crate) fn build_candidates(
    cards: &[RawRecord],
    rating_pattern: &Regex,
    request: &SearchRequest,
) -> Result<Vec<CandidateRecord>, StageError> {
    let mut candidates = Vec::with_capacity(cards.len().min(request.max_candidates()));

    for (index, card) in cards.iter().enumerate() {
        let card_index = index + 1;
        let missing = |field| StageError::ListingExtraction { card_index, field };

        let name = card.get(NAME).ok_or_else(|| missing(NAME))?;
        let link = card.get(LINK).ok_or_else(|| missing(LINK))?;
        let (average_rating, review_count) = parse_rating(card.get(RATING), rating_pattern);

        if candidates.len() < request.max_candidates() {
            candidates.push(CandidateRecord {
                id: card_index.to_string(),
                display_name: name.to_string(),
                average_rating,
                review_count,
                detail_link: link.to_string(),
                query: request.query().to_string(),
                location: request.location().to_string(),
            });
        }
    }

    Ok(candidates)
}
