pub mod dashboard;
pub mod payment_methods;
pub mod plans;
pub mod subscriptions;
pub mod user_details;
pub mod users;
pub mod vehicles;
