use json::JsonValue;

use crate::model::stats::AdminStats;

use super::ParsingError;

pub fn parse_admin_stats(json: &JsonValue) -> Result<AdminStats, ParsingError> {
    let total_users = json["totalUsers"]
        .as_u32()
        .ok_or(ParsingError::InvalidType("totalUsers".into()))?;
    let total_boosters = json["totalBoosters"]
        .as_u32()
        .ok_or(ParsingError::InvalidType("totalBoosters".into()))?;
    let total_orders = json["totalOrders"]
        .as_u32()
        .ok_or(ParsingError::InvalidType("totalOrders".into()))?;
    let active_orders = json["activeOrders"]
        .as_u32()
        .ok_or(ParsingError::InvalidType("activeOrders".into()))?;
    let total_revenue = json["totalRevenue"]
        .as_f64()
        .ok_or(ParsingError::InvalidType("totalRevenue".into()))?;

    Ok(AdminStats {
        total_users,
        total_boosters,
        total_orders,
        active_orders,
        total_revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_require_every_counter() {
        let json = json::object! {
            totalUsers: 120, totalBoosters: 14, totalOrders: 310,
            activeOrders: 22, totalRevenue: 10543.5,
        };
        let stats = parse_admin_stats(&json).unwrap();
        assert_eq!(stats.total_boosters, 14);
        assert_eq!(stats.total_revenue, 10543.5);

        let incomplete = json::object! { totalUsers: 120 };
        assert!(parse_admin_stats(&incomplete).is_err());
    }
}
