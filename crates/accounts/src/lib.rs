//! Core tenant: users and subscriptions shared by every Ansiversa app.

pub mod mappers;
pub mod models;
pub mod subscriptions;
pub mod tables;
pub mod users;

pub use models::{
    NewSubscription, NewUser, Subscription, SubscriptionStatus, SubscriptionStatusUpdate, User,
    UserUpdate,
};
pub use tables::{CORE, CORE_TABLES};
