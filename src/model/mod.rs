pub mod booster;
pub mod ids;
pub mod order;
pub mod pricing;
pub mod rank;
pub mod review;
pub mod stats;
pub mod user;
