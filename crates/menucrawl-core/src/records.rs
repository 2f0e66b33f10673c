//! Records produced by the extraction pipeline and the JSON shape handed to
//! downstream consumers.

use serde::{Deserialize, Serialize};

/// A restaurant discovered on the filtered listing page, before its menu has
/// been visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// 1-based position on the listing page, stringified.
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    /// Average star rating as printed on the card, e.g. `"4.5"`.
    #[serde(rename = "avgRating")]
    pub average_rating: Option<String>,
    #[serde(rename = "noOfReviews")]
    pub review_count: Option<String>,
    /// Absolute URL of the restaurant's detail (menu) page.
    #[serde(rename = "link")]
    pub detail_link: String,
    /// Echo of the search query; doubles as the cuisine label.
    #[serde(rename = "cuisine")]
    pub query: String,
    pub location: String,
}

/// One priced menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub name: String,
    pub price: f64,
}

/// A restaurant with its (truncated) menu, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub location: String,
    pub menu: Vec<ItemRecord>,
}

impl ResultEntry {
    #[must_use]
    pub fn from_candidate(candidate: &CandidateRecord, menu: Vec<ItemRecord>) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.display_name.clone(),
            cuisine: candidate.query.clone(),
            location: candidate.location.clone(),
            menu,
        }
    }
}

/// Result entries in candidate processing order.
pub type PipelineResult = Vec<ResultEntry>;

/// Success body shared by the HTTP and CLI adapters: `{"restaurants": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantsEnvelope {
    pub restaurants: PipelineResult,
}

/// Builds an item's product id: the candidate id followed by the 1-based item
/// ordinal zero-padded to two digits (`"3"`, 2 → `"302"`).
#[must_use]
pub fn product_id(candidate_id: &str, ordinal: usize) -> String {
    format!("{candidate_id}{ordinal:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> CandidateRecord {
        CandidateRecord {
            id: "3".to_string(),
            display_name: "Golden Dragon".to_string(),
            average_rating: Some("4.5".to_string()),
            review_count: Some("120".to_string()),
            detail_link: "https://example.com/golden-dragon".to_string(),
            query: "chinese".to_string(),
            location: "Palo Alto, CA".to_string(),
        }
    }

    #[test]
    fn product_id_pads_single_digit_ordinals() {
        assert_eq!(product_id("3", 2), "302");
        assert_eq!(product_id("1", 1), "101");
    }

    #[test]
    fn product_id_keeps_two_digit_ordinals() {
        assert_eq!(product_id("12", 10), "1210");
        assert_eq!(product_id("4", 100), "4100");
    }

    #[test]
    fn result_entry_copies_candidate_identity() {
        let entry = ResultEntry::from_candidate(&candidate(), vec![]);
        assert_eq!(entry.id, "3");
        assert_eq!(entry.name, "Golden Dragon");
        assert_eq!(entry.cuisine, "chinese");
        assert_eq!(entry.location, "Palo Alto, CA");
        assert!(entry.menu.is_empty());
    }

    #[test]
    fn envelope_serializes_with_wire_names() {
        let envelope = RestaurantsEnvelope {
            restaurants: vec![ResultEntry::from_candidate(
                &candidate(),
                vec![ItemRecord {
                    product_id: "301".to_string(),
                    name: "Mapo Tofu".to_string(),
                    price: 12.5,
                }],
            )],
        };
        let json = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(json["restaurants"][0]["id"], "3");
        assert_eq!(json["restaurants"][0]["menu"][0]["productId"], "301");
        assert_eq!(json["restaurants"][0]["menu"][0]["price"], 12.5);
    }

    #[test]
    fn candidate_serializes_rating_fields() {
        let json = serde_json::to_value(candidate()).expect("serialize");
        assert_eq!(json["avgRating"], "4.5");
        assert_eq!(json["noOfReviews"], "120");
        assert_eq!(json["link"], "https://example.com/golden-dragon");
        assert_eq!(json["cuisine"], "chinese");
    }
}
