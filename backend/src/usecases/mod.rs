pub mod action_errors;
pub mod dashboard;
pub mod payment_methods;
pub mod plan_catalog;
pub mod subscriptions;
pub mod user_details;
pub mod users;
pub mod vehicles;
