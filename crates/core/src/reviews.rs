//! Product reviews and rating summaries.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ReviewId;

/// A shopper's review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub reviewer_name: String,
    pub date: NaiveDate,
    /// Star rating, 1 to 5.
    pub rating: u8,
    /// Purchased variant label, e.g. `Trắng - L`.
    #[serde(default)]
    pub variant: String,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Number of shoppers who marked the review helpful.
    #[serde(default)]
    pub helpful: u32,
}

/// Reviews and sales count for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReviews {
    #[serde(default)]
    pub total_sales: u64,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Aggregate rating shown on a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Mean rating rounded to one decimal place.
    pub average_rating: Decimal,
    pub total_reviews: usize,
    pub total_sales: u64,
    /// Review count per star, index 0 is one star.
    pub distribution: [usize; 5],
}

impl ReviewSummary {
    /// Summarize `reviews`. Returns `None` when there are none.
    ///
    /// Ratings outside 1..=5 are clamped into range.
    #[must_use]
    pub fn from_reviews(reviews: &[Review], total_sales: u64) -> Option<Self> {
        if reviews.is_empty() {
            return None;
        }

        let mut distribution = [0_usize; 5];
        let mut sum = 0_u64;
        for review in reviews {
            let stars = review.rating.clamp(1, 5);
            sum += u64::from(stars);
            if let Some(count) = distribution.get_mut(usize::from(stars - 1)) {
                *count += 1;
            }
        }

        let average = Decimal::from(sum) / Decimal::from(reviews.len());
        Some(Self {
            average_rating: average.round_dp(1).normalize(),
            total_reviews: reviews.len(),
            total_sales,
            distribution,
        })
    }
}

/// Reviews for every product, keyed by product slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReviewStore {
    by_slug: HashMap<String, ProductReviews>,
}

impl ReviewStore {
    /// Load reviews from their JSON fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the review schema.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reviews for a product, or `None` if it has none on file.
    #[must_use]
    pub fn for_product(&self, slug: &str) -> Option<&ProductReviews> {
        self.by_slug.get(slug)
    }

    /// Rating summary for a product, `None` when it has no reviews.
    #[must_use]
    pub fn summary(&self, slug: &str) -> Option<ReviewSummary> {
        let reviews = self.for_product(slug)?;
        ReviewSummary::from_reviews(&reviews.reviews, reviews.total_sales)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "ao-thun": {
            "totalSales": 852,
            "reviews": [
                {"id": "r1", "reviewerName": "Minh Anh", "date": "2025-01-15", "rating": 5,
                 "variant": "Trắng - L", "comment": "Áo rất đẹp", "images": ["/a.svg"], "helpful": 12},
                {"id": "r2", "reviewerName": "Tuấn Việt", "date": "2025-01-12", "rating": 4,
                 "variant": "Trắng - M", "comment": "Chất lượng tốt", "helpful": 8},
                {"id": "r3", "reviewerName": "Thu Hà", "date": "2025-01-10", "rating": 4,
                 "comment": "Ổn"}
            ]
        },
        "quan-jean": {"totalSales": 3, "reviews": []}
    }"#;

    #[test]
    fn test_summary_rounds_average() {
        let store = ReviewStore::from_json(FIXTURE).unwrap();
        let summary = store.summary("ao-thun").unwrap();
        // 13 / 3 = 4.333...
        assert_eq!(summary.average_rating, Decimal::new(43, 1));
        assert_eq!(summary.total_reviews, 3);
        assert_eq!(summary.total_sales, 852);
        assert_eq!(summary.distribution, [0, 0, 0, 2, 1]);
    }

    #[test]
    fn test_no_reviews_no_summary() {
        let store = ReviewStore::from_json(FIXTURE).unwrap();
        assert!(store.summary("quan-jean").is_none());
        assert!(store.summary("missing").is_none());
        assert!(store.for_product("quan-jean").is_some());
    }

    #[test]
    fn test_out_of_range_rating_is_clamped() {
        let store = ReviewStore::from_json(FIXTURE).unwrap();
        let mut reviews = store.for_product("ao-thun").unwrap().reviews.clone();
        reviews.truncate(1);
        reviews[0].rating = 9;
        let summary = ReviewSummary::from_reviews(&reviews, 0).unwrap();
        assert_eq!(summary.average_rating, Decimal::from(5));
        assert_eq!(summary.distribution, [0, 0, 0, 0, 1]);
    }
}
