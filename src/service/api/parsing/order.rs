use json::JsonValue;

use crate::model::{
    order::{BoostOptions, Lane, MatchRecord, Order, OrderIntent, OrderStatus},
    rank::BoostTarget,
};

use super::{parse_rank, parse_timestamp, ParsingError};

pub fn parse_orders(json: &JsonValue) -> Result<Vec<Order>, ParsingError> {
    if let JsonValue::Array(array) = json {
        let mut orders = Vec::new();
        for entry in array {
            orders.push(parse_order(entry)?);
        }
        return Ok(orders);
    }

    Err(ParsingError::InvalidType("root".into()))
}

pub fn parse_order(json: &JsonValue) -> Result<Order, ParsingError> {
    let id = json["id"]
        .as_u64()
        .ok_or(ParsingError::InvalidType("id".into()))?;
    let status_raw = json["status"]
        .as_str()
        .ok_or(ParsingError::InvalidType("status".into()))?;
    let status = OrderStatus::from_str(status_raw)
        .ok_or(ParsingError::UnknownValue("status".into(), status_raw.to_string()))?;
    let total_price = json["totalPrice"]
        .as_f64()
        .ok_or(ParsingError::InvalidType("totalPrice".into()))?;

    let start = parse_rank(&json["startRank"], "startRank")?;
    let target = if json["winCount"].is_null() {
        BoostTarget::Rank(parse_rank(&json["targetRank"], "targetRank")?)
    } else {
        let count = json["winCount"]
            .as_u32()
            .ok_or(ParsingError::InvalidType("winCount".into()))?;
        let tier = parse_rank(&json["targetRank"], "targetRank")?.tier;
        BoostTarget::Wins { tier, count }
    };

    let booster = json["boosterId"].as_u64().map(Into::into);
    let current_rank = if json["currentRank"].is_null() {
        None
    } else {
        Some(parse_rank(&json["currentRank"], "currentRank")?)
    };

    let lane = match json["lane"].as_str() {
        Some(raw) => {
            Some(Lane::from_name(raw).ok_or(ParsingError::UnknownValue("lane".into(), raw.to_string()))?)
        }
        None => None,
    };

    let options = BoostOptions {
        duo: json["duo"].as_bool().unwrap_or(false),
        champion: json["champion"].as_str().map(str::to_string),
        lane,
        offline: json["offline"].as_bool().unwrap_or(false),
        private_stream: json["privateStream"].as_bool().unwrap_or(false),
    };

    let created_at = parse_timestamp(&json["createdAt"], "createdAt")?;

    Ok(Order {
        id: id.into(),
        booster,
        intent: OrderIntent { start, target, options },
        status,
        total_price,
        current_rank,
        created_at,
    })
}

pub fn parse_matches(json: &JsonValue) -> Result<Vec<MatchRecord>, ParsingError> {
    if let JsonValue::Array(array) = json {
        let mut matches = Vec::new();
        for entry in array {
            let id = entry["id"]
                .as_u64()
                .ok_or(ParsingError::InvalidType("id".into()))?;
            let order = entry["orderId"]
                .as_u64()
                .ok_or(ParsingError::InvalidType("orderId".into()))?;
            let champion = entry["champion"]
                .as_str()
                .ok_or(ParsingError::InvalidType("champion".into()))?;
            let victory = entry["victory"]
                .as_bool()
                .ok_or(ParsingError::InvalidType("victory".into()))?;
            let played_at = parse_timestamp(&entry["playedAt"], "playedAt")?;

            matches.push(MatchRecord {
                id: id.into(),
                order: order.into(),
                champion: champion.to_string(),
                victory,
                played_at,
            });
        }
        return Ok(matches);
    }

    Err(ParsingError::InvalidType("root".into()))
}

#[cfg(test)]
mod tests {
    use crate::model::rank::{Division, Rank, Tier};

    use super::*;

    #[test]
    fn orders_parse_rank_and_win_targets() {
        let json = json::object! {
            id: 12,
            boosterId: 3,
            status: "in_progress",
            totalPrice: 57.5,
            startRank: { tier: "Silver", division: "III" },
            targetRank: { tier: "Gold", division: "IV" },
            duo: true,
            createdAt: "2026-02-11T09:30:00Z",
        };
        let order = parse_order(&json).unwrap();
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.intent.start, Rank::new(Tier::Silver, Division::Three));
        assert!(order.intent.options.duo);
        assert!(order.intent.options.champion.is_none());

        let json = json::object! {
            id: 13,
            status: "pending",
            totalPrice: 80.0,
            startRank: { tier: "Master" },
            targetRank: { tier: "Master" },
            winCount: 10,
            createdAt: "2026-02-11T09:30:00Z",
        };
        let order = parse_order(&json).unwrap();
        assert_eq!(
            order.intent.target,
            BoostTarget::Wins {
                tier: Tier::Master,
                count: 10
            }
        );
        assert!(order.booster.is_none());
    }

    #[test]
    fn match_records_parse() {
        let json = json::array![
            { id: 1, orderId: 12, champion: "Ahri", victory: true, playedAt: "2026-02-12T20:00:00Z" },
            { id: 2, orderId: 12, champion: "Lux", victory: false, playedAt: "2026-02-12T21:00:00Z" },
        ];
        let matches = parse_matches(&json).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].victory);
        assert_eq!(matches[1].champion, "Lux");
    }
}
