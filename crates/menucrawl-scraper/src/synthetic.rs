//! Synthetic restaurants for development and for runs where the live site
//! is unavailable.
//!
//! Output has the same shape as a live run: `max_candidates` entries of
//! `max_items_per_candidate` items, with the usual id and product id scheme.

use menucrawl_core::{product_id, ItemRecord, PipelineResult, ResultEntry, SearchRequest};
use rand::Rng;

const MIN_PRICE: f64 = 10.0;
const MAX_PRICE: f64 = 20.0;

/// Builds a result for `request` with prices drawn from `rng`.
#[must_use]
pub fn generate_restaurants<R: Rng>(request: &SearchRequest, rng: &mut R) -> PipelineResult {
    let query = request.query();

    (1..=request.max_candidates())
        .map(|i| {
            let id = i.to_string();
            let menu = (1..=request.max_items_per_candidate())
                .map(|j| ItemRecord {
                    product_id: product_id(&id, j),
                    name: format!("{query} Item {j}"),
                    price: round_cents(rng.random_range(MIN_PRICE..MAX_PRICE)),
                })
                .collect();

            ResultEntry {
                id,
                name: format!("{query} Restaurant {i}"),
                cuisine: query.to_string(),
                location: request.location().to_string(),
                menu,
            }
        })
        .collect()
}

/// [`generate_restaurants`] seeded from the thread-local generator.
#[must_use]
pub fn generate_with_thread_rng(request: &SearchRequest) -> PipelineResult {
    generate_restaurants(request, &mut rand::rng())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
