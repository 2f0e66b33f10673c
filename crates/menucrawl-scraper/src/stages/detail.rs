//! Detail extraction: visit one candidate's menu page on a page of its own.
//!
//! Every fault here is contained to the candidate. The page is closed on
//! every path and the caller gets a [`CandidateOutcome`] either way.

use menucrawl_core::{product_id, CandidateRecord, ItemRecord, ResultEntry, SiteProfile};

use crate::driver::{Driver, FieldSpec, RawRecord, RenderSession};
use crate::error::CandidateFault;
use crate::parse::parse_price;
use crate::wait::WaitPolicy;

const NAME: &str = "name";
const PRICE: &str = "price";

/// Result of visiting one candidate.
#[derive(Debug)]
pub enum CandidateOutcome {
    Extracted(ResultEntry),
    Skipped {
        candidate_id: String,
        reason: CandidateFault,
    },
}

/// Opens a page for `candidate`, reads up to `max_items` menu items, and
/// closes the page again.
pub async fn extract_menu<D: Driver>(
    driver: &D,
    profile: &SiteProfile,
    candidate: &CandidateRecord,
    max_items: usize,
) -> CandidateOutcome {
    let outcome = match driver.open_session().await {
        Ok(session) => {
            let menu = read_menu(&session, profile, candidate, max_items).await;
            if let Err(e) = session.close().await {
                tracing::warn!(candidate_id = %candidate.id, error = %e, "failed to close detail page");
            }
            menu
        }
        Err(e) => Err(CandidateFault::Session(e)),
    };

    match outcome {
        Ok(menu) => {
            tracing::debug!(
                candidate_id = %candidate.id,
                name = %candidate.display_name,
                items = menu.len(),
                "menu extracted"
            );
            CandidateOutcome::Extracted(ResultEntry::from_candidate(candidate, menu))
        }
        Err(reason) => {
            tracing::warn!(
                candidate_id = %candidate.id,
                name = %candidate.display_name,
                link = %candidate.detail_link,
                error = %reason,
                "skipping candidate"
            );
            CandidateOutcome::Skipped {
                candidate_id: candidate.id.clone(),
                reason,
            }
        }
    }
}

async fn read_menu<S: RenderSession>(
    session: &S,
    profile: &SiteProfile,
    candidate: &CandidateRecord,
    max_items: usize,
) -> Result<Vec<ItemRecord>, CandidateFault> {
    let sel = &profile.selectors;
    let t = &profile.timeouts;

    session
        .navigate(&candidate.detail_link)
        .await
        .map_err(|source| CandidateFault::Navigation {
            url: candidate.detail_link.clone(),
            source,
        })?;

    session
        .wait_for(
            &sel.menu_item,
            WaitPolicy::new(t.menu_items(), t.poll_interval()),
        )
        .await
        .map_err(CandidateFault::NoItems)?;

    let fields = [
        FieldSpec::text(NAME, &sel.item_name),
        FieldSpec::text(PRICE, &sel.item_price),
    ];
    let items = session
        .extract_all(&sel.menu_item, &fields)
        .await
        .map_err(CandidateFault::Extraction)?;

    build_menu(&candidate.id, &items, max_items)
}

/// Converts the first `max_items` raw items into priced records. Items past
/// the limit are never inspected.
pub(crate) fn build_menu(
    candidate_id: &str,
    items: &[RawRecord],
    max_items: usize,
) -> Result<Vec<ItemRecord>, CandidateFault> {
    items
        .iter()
        .take(max_items)
        .enumerate()
        .map(|(index, raw)| {
            let item_index = index + 1;
            let name = raw.get(NAME).ok_or(CandidateFault::MissingField {
                item_index,
                field: NAME,
            })?;
            let price_text = raw.get(PRICE).ok_or(CandidateFault::MissingField {
                item_index,
                field: PRICE,
            })?;
            let price = parse_price(price_text).ok_or_else(|| CandidateFault::InvalidPrice {
                item_index,
                raw: price_text.to_string(),
            })?;

            Ok(ItemRecord {
                product_id: product_id(candidate_id, item_index),
                name: name.to_string(),
                price,
            })
        })
        .collect()
}
