pub mod payments;
pub mod posts;
pub mod subscriptions;
pub mod users;
