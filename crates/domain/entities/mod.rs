pub mod payment_methods;
pub mod payments;
pub mod subscription_plans;
pub mod subscription_transfers;
pub mod subscriptions;
pub mod users;
pub mod vehicles;
pub mod washes;
