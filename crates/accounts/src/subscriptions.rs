//! Subscription reads and status changes.

use ansiversa_db::operations::{insert_row, lookup, OperationKind};
use ansiversa_db::{DbContext, DbResult, Statement, Value};
use tracing::debug;

use crate::mappers::to_subscription;
use crate::models::{NewSubscription, Subscription, SubscriptionStatus, SubscriptionStatusUpdate};
use crate::tables::{CORE, CORE_TABLES, SUBSCRIPTIONS};

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, plan, status, period_start, period_end, created_at, updated_at";

/// All subscriptions of a user, newest first.
pub async fn subscriptions_for_user(ctx: &DbContext, user_id: &str) -> DbResult<Vec<Subscription>> {
    let db = ctx.prepare(&CORE).await?;
    let statement = Statement::new(format!(
        "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE user_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id);
    let output = db.execute(statement).await?;
    Ok(output.rows.iter().map(to_subscription).collect())
}

/// The most recent active subscription, if any.
pub async fn active_subscription_for_user(
    ctx: &DbContext,
    user_id: &str,
) -> DbResult<Option<Subscription>> {
    let db = ctx.prepare(&CORE).await?;
    let statement = Statement::new(format!(
        "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE user_id = ? AND status = ? ORDER BY created_at DESC, id DESC LIMIT 1"
    ))
    .bind(user_id)
    .bind(SubscriptionStatus::Active);
    let output = db.execute(statement).await?;
    Ok(output.first().map(to_subscription))
}

pub async fn create_subscription(ctx: &DbContext, input: &NewSubscription) -> DbResult<Subscription> {
    let db = ctx.prepare(&CORE).await?;
    let args = vec![
        input.user_id.clone().into(),
        input.plan.clone().into(),
        input.status.into(),
        input.period_start.clone().into(),
        input.period_end.clone().into(),
    ];
    let row = insert_row(db.as_ref(), CORE_TABLES, SUBSCRIPTIONS, args).await?;
    Ok(to_subscription(&row))
}

/// Change a subscription's status. Returns `None` when the id is unknown.
pub async fn update_subscription_status(
    ctx: &DbContext,
    input: &SubscriptionStatusUpdate,
) -> DbResult<Option<Subscription>> {
    let db = ctx.prepare(&CORE).await?;
    let sql = lookup(CORE_TABLES, SUBSCRIPTIONS, OperationKind::Update)?;
    let args = vec![
        Value::Null,
        input.status.into(),
        Value::Null,
        input.period_end.clone().into(),
        input.id.into(),
    ];
    let output = db.execute(Statement::with_args(sql, args)).await?;
    if output.rows.is_empty() {
        debug!(id = input.id, "No subscription to update");
    }
    Ok(output.first().map(to_subscription))
}
