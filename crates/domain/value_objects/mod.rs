pub mod dashboard;
pub mod enums;
pub mod field_errors;
pub mod money;
pub mod payment_methods;
pub mod payments;
pub mod plans;
pub mod subscriptions;
pub mod user_details;
pub mod users;
pub mod vehicles;
