//! User lookups and maintenance.

use ansiversa_db::operations::{delete_row, insert_row, update_row};
use ansiversa_db::{DbContext, DbResult, Statement, Value};

use crate::mappers::to_user;
use crate::models::{NewUser, User, UserUpdate};
use crate::tables::{CORE, CORE_TABLES, USERS};

const USER_COLUMNS: &str = "id, email, name, created_at, updated_at";

async fn find_one(ctx: &DbContext, column: &str, value: &str) -> DbResult<Option<User>> {
    let db = ctx.prepare(&CORE).await?;
    let statement = Statement::new(format!(
        "SELECT {USER_COLUMNS} FROM users WHERE {column} = ? LIMIT 1"
    ))
    .bind(value);
    let output = db.execute(statement).await?;
    Ok(output.first().map(to_user))
}

pub async fn get_user_by_id(ctx: &DbContext, user_id: &str) -> DbResult<Option<User>> {
    find_one(ctx, "id", user_id).await
}

pub async fn get_user_by_email(ctx: &DbContext, email: &str) -> DbResult<Option<User>> {
    find_one(ctx, "email", email).await
}

pub async fn create_user(ctx: &DbContext, input: &NewUser) -> DbResult<User> {
    let db = ctx.prepare(&CORE).await?;
    let args = vec![
        input.id.clone().into(),
        input.email.clone().into(),
        input.name.clone().into(),
    ];
    let row = insert_row(db.as_ref(), CORE_TABLES, USERS, args).await?;
    Ok(to_user(&row))
}

pub async fn update_user(ctx: &DbContext, input: &UserUpdate) -> DbResult<User> {
    let db = ctx.prepare(&CORE).await?;
    let args = vec![
        input.email.clone().into(),
        input.name.clone().into(),
        input.id.clone().into(),
    ];
    let row = update_row(db.as_ref(), CORE_TABLES, USERS, args).await?;
    Ok(to_user(&row))
}

/// Delete a user together with their subscriptions.
pub async fn delete_user(ctx: &DbContext, user_id: &str) -> DbResult<bool> {
    let db = ctx.prepare(&CORE).await?;
    delete_row(db.as_ref(), CORE_TABLES, USERS, Value::from(user_id)).await
}
