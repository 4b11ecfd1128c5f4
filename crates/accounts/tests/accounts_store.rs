//! Core tenant operations against an in-memory SQLite database.

use ansiversa_accounts::subscriptions::{
    active_subscription_for_user, create_subscription, subscriptions_for_user,
    update_subscription_status,
};
use ansiversa_accounts::users::{
    create_user, delete_user, get_user_by_email, get_user_by_id, update_user,
};
use ansiversa_accounts::{
    NewSubscription, NewUser, SubscriptionStatus, SubscriptionStatusUpdate, UserUpdate,
};
use ansiversa_db::{ConnectionConfig, DbConfig, DbContext, DbError};

fn context() -> DbContext {
    DbContext::new(DbConfig::new(ConnectionConfig::new(
        "sqlite::memory:",
        "test-token",
    )))
}

fn new_user(id: &str) -> NewUser {
    NewUser {
        id: id.into(),
        email: format!("{id}@ansiversa.test"),
        name: Some("Asha".into()),
    }
}

fn plan(user_id: &str, plan: &str, status: Option<SubscriptionStatus>) -> NewSubscription {
    NewSubscription {
        user_id: user_id.into(),
        plan: plan.into(),
        status,
        period_start: Some("2025-01-01".into()),
        period_end: Some("2025-12-31".into()),
    }
}

#[tokio::test]
async fn user_lifecycle() {
    let ctx = context();
    let created = create_user(&ctx, &new_user("u-1")).await.unwrap();
    assert_eq!(created.email, "u-1@ansiversa.test");
    assert!(created.created_at.is_some());

    let by_email = get_user_by_email(&ctx, "u-1@ansiversa.test")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email, created);

    let renamed = update_user(
        &ctx,
        &UserUpdate {
            id: "u-1".into(),
            name: Some("Asha K".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.name.as_deref(), Some("Asha K"));
    assert_eq!(renamed.email, created.email);

    assert!(delete_user(&ctx, "u-1").await.unwrap());
    assert!(get_user_by_id(&ctx, "u-1").await.unwrap().is_none());
    assert!(!delete_user(&ctx, "u-1").await.unwrap());
}

#[tokio::test]
async fn duplicate_email_is_a_database_error() {
    let ctx = context();
    create_user(&ctx, &new_user("u-1")).await.unwrap();

    let clash = NewUser {
        id: "u-2".into(),
        ..new_user("u-1")
    };
    let err = create_user(&ctx, &clash).await.unwrap_err();
    assert!(matches!(err, DbError::Sqlx(_)));
}

#[tokio::test]
async fn updating_unknown_user_is_an_integrity_error() {
    let ctx = context();
    let err = update_user(
        &ctx,
        &UserUpdate {
            id: "ghost".into(),
            email: Some("ghost@ansiversa.test".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        DbError::MutationIntegrity { ref entity, operation: "update" } if entity == "users"
    ));
}

#[tokio::test]
async fn active_subscription_prefers_the_latest() {
    let ctx = context();
    create_user(&ctx, &new_user("u-1")).await.unwrap();

    let basic = create_subscription(&ctx, &plan("u-1", "basic", None))
        .await
        .unwrap();
    assert_eq!(basic.status, SubscriptionStatus::Active);
    let pro = create_subscription(&ctx, &plan("u-1", "pro", None))
        .await
        .unwrap();
    create_subscription(
        &ctx,
        &plan("u-1", "trial", Some(SubscriptionStatus::Expired)),
    )
    .await
    .unwrap();

    let all = subscriptions_for_user(&ctx, "u-1").await.unwrap();
    let plans: Vec<_> = all.iter().map(|sub| sub.plan.as_str()).collect();
    assert_eq!(plans, vec!["trial", "pro", "basic"]);

    let active = active_subscription_for_user(&ctx, "u-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, pro.id);
}

#[tokio::test]
async fn status_update_reports_missing_rows_as_none() {
    let ctx = context();
    create_user(&ctx, &new_user("u-1")).await.unwrap();
    let sub = create_subscription(&ctx, &plan("u-1", "pro", None))
        .await
        .unwrap();

    let cancelled = update_subscription_status(
        &ctx,
        &SubscriptionStatusUpdate {
            id: sub.id,
            status: SubscriptionStatus::Cancelled,
            period_end: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);
    assert_eq!(cancelled.period_end.as_deref(), Some("2025-12-31"));
    assert!(active_subscription_for_user(&ctx, "u-1")
        .await
        .unwrap()
        .is_none());

    let missing = update_subscription_status(
        &ctx,
        &SubscriptionStatusUpdate {
            id: sub.id + 100,
            status: SubscriptionStatus::Active,
            period_end: None,
        },
    )
    .await
    .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn deleting_a_user_removes_their_subscriptions() {
    let ctx = context();
    create_user(&ctx, &new_user("u-1")).await.unwrap();
    create_subscription(&ctx, &plan("u-1", "pro", None))
        .await
        .unwrap();

    delete_user(&ctx, "u-1").await.unwrap();
    assert!(subscriptions_for_user(&ctx, "u-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn subscription_requires_existing_user() {
    let ctx = context();
    let err = create_subscription(&ctx, &plan("nobody", "pro", None))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Sqlx(_)));
}
