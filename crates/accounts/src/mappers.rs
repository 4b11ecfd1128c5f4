//! Row → record conversions for the core tables.

use ansiversa_db::coerce::{int, opt_text, text, timestamp};
use ansiversa_db::Row;

use crate::models::{Subscription, SubscriptionStatus, User};

pub fn to_user(row: &Row) -> User {
    User {
        id: text(row, "id"),
        email: text(row, "email"),
        name: opt_text(row, "name"),
        created_at: timestamp(row, "created_at"),
        updated_at: timestamp(row, "updated_at"),
    }
}

pub fn to_subscription(row: &Row) -> Subscription {
    Subscription {
        id: int(row, "id"),
        user_id: text(row, "user_id"),
        plan: text(row, "plan"),
        status: SubscriptionStatus::parse(&text(row, "status")),
        period_start: opt_text(row, "period_start"),
        period_end: opt_text(row, "period_end"),
        created_at: timestamp(row, "created_at"),
        updated_at: timestamp(row, "updated_at"),
    }
}
