pub mod api;
pub mod data_manager;
pub mod quotes;
pub mod session;
