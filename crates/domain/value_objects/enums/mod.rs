pub mod account_statuses;
pub mod item_types;
pub mod payment_statuses;
pub mod subscription_statuses;
pub mod vehicle_colors;
