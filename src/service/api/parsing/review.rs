use json::JsonValue;

use crate::model::review::Review;

use super::{parse_timestamp, ParsingError};

pub fn parse_reviews(json: &JsonValue) -> Result<Vec<Review>, ParsingError> {
    if let JsonValue::Array(array) = json {
        let mut reviews = Vec::new();
        for entry in array {
            let order = entry["orderId"]
                .as_u64()
                .ok_or(ParsingError::InvalidType("orderId".into()))?;
            let booster = entry["boosterId"]
                .as_u64()
                .ok_or(ParsingError::InvalidType("boosterId".into()))?;
            let rating = entry["rating"]
                .as_u8()
                .ok_or(ParsingError::InvalidType("rating".into()))?;
            let comment = entry["comment"].as_str().unwrap_or_default();
            let created_at = parse_timestamp(&entry["createdAt"], "createdAt")?;

            reviews.push(Review {
                order: order.into(),
                booster: booster.into(),
                rating,
                comment: comment.to_string(),
                created_at,
            });
        }
        return Ok(reviews);
    }

    Err(ParsingError::InvalidType("root".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviews_parse_with_and_without_comment() {
        let json = json::array![
            {
                orderId: 7, boosterId: 2, rating: 5,
                comment: "fast and clean", createdAt: "2026-03-01T10:00:00Z",
            },
            { orderId: 8, boosterId: 2, rating: 3, createdAt: "2026-03-02T10:00:00Z" },
        ];

        let reviews = parse_reviews(&json).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, 5);
        assert_eq!(reviews[1].comment, "");
    }

    #[test]
    fn non_array_root_is_rejected() {
        assert!(parse_reviews(&json::object! { rating: 5 }).is_err());
    }
}
