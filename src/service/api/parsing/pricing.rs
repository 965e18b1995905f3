use json::JsonValue;

use crate::model::{
    pricing::{BulkPricingConfig, PriceTable, PriceTableEntry},
    rank::Tier,
};

use super::{parse_rank, ParsingError};

pub fn parse_bulk_config(json: &JsonValue) -> Result<BulkPricingConfig, ParsingError> {
    let mut config = BulkPricingConfig::default();

    for (name, value) in json["divisionPrices"].entries() {
        let tier =
            Tier::from_name(name).ok_or(ParsingError::UnknownValue("divisionPrices".into(), name.to_string()))?;
        let price = value
            .as_f64()
            .ok_or(ParsingError::InvalidType(format!("divisionPrices.{}", name)))?;
        config.division_prices.insert(tier, price);
    }

    for (name, value) in json["transitionFees"].entries() {
        let tier =
            Tier::from_name(name).ok_or(ParsingError::UnknownValue("transitionFees".into(), name.to_string()))?;
        let fee = value
            .as_f64()
            .ok_or(ParsingError::InvalidType(format!("transitionFees.{}", name)))?;
        config.transition_fees.insert(tier, fee);
    }

    Ok(config)
}

pub fn parse_price_table(json: &JsonValue) -> Result<PriceTable, ParsingError> {
    if let JsonValue::Array(array) = &json["entries"] {
        let mut entries = Vec::new();
        for entry in array {
            let from = parse_rank(&entry["from"], "from")?;
            let to = parse_rank(&entry["to"], "to")?;
            let price = entry["price"]
                .as_f64()
                .ok_or(ParsingError::InvalidType("price".into()))?;
            entries.push(PriceTableEntry { from, to, price });
        }
        return Ok(PriceTable { entries });
    }

    Err(ParsingError::InvalidType("entries".into()))
}

/// Response of the per-pair calculate endpoints: a single price.
pub fn parse_calculated_price(json: &JsonValue) -> Result<f64, ParsingError> {
    json["price"]
        .as_f64()
        .ok_or(ParsingError::InvalidType("price".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_config_maps_tier_names_to_prices() {
        let json = json::object! {
            divisionPrices: { Iron: 5.0, Bronze: 6 },
            transitionFees: { Bronze: 10.0 },
        };
        let config = parse_bulk_config(&json).unwrap();
        assert_eq!(config.division_price(Tier::Iron), Some(5.0));
        assert_eq!(config.division_price(Tier::Bronze), Some(6.0));
        assert_eq!(config.transition_fee_into(Tier::Bronze), Some(10.0));
        assert_eq!(config.transition_fee_into(Tier::Iron), None);
    }

    #[test]
    fn unknown_tier_names_fail_loudly() {
        let json = json::object! {
            divisionPrices: { Wood: 5.0 },
        };
        assert!(parse_bulk_config(&json).is_err());
    }
}
