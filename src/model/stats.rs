/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone)]
pub struct AdminStats {
    pub total_users: u32,
    pub total_boosters: u32,
    pub total_orders: u32,
    pub active_orders: u32,
    pub total_revenue: f64,
}
