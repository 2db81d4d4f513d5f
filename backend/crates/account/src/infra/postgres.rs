//! PostgreSQL Account Store

use sqlx::PgPool;
use sqlx::types::Json;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::AccountStore;
use crate::domain::value_object::email::Email;
use crate::error::{AccountError, AccountResult};
use crate::infra::document::UserDocument;

const SCHEMA: &str = include_str!("../../migrations/0001_create_accounts.sql");

const EMAIL_KEY: &str = "accounts_email_canonical_key";
const USER_NAME_KEY: &str = "accounts_user_name_canonical_key";

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `accounts` table and its indexes if missing
    pub async fn migrate(&self) -> AccountResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("Account schema is up to date");
        Ok(())
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> AccountResult<Option<User>> {
        // `column` is one of the fixed key columns below, never caller input
        let sql = format!("SELECT document FROM accounts WHERE {column} = $1");
        let row: Option<AccountRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(AccountRow::into_user).transpose()
    }
}

/// Map unique-key violations to the taken-key errors
fn map_unique_violation(err: sqlx::Error) -> AccountError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => match db.constraint() {
            Some(EMAIL_KEY) => AccountError::EmailTaken,
            Some(USER_NAME_KEY) => AccountError::UserNameTaken,
            _ => AccountError::Conflict,
        },
        _ => AccountError::Database(err),
    }
}

/// Escape `%`, `_` and `\` so the term matches literally inside ILIKE
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl AccountStore for PgAccountStore {
    async fn create(&self, user: &User) -> AccountResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                user_id, email_canonical, user_name_canonical, display_name,
                is_active, document, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id.into_uuid())
        .bind(user.email.as_str())
        .bind(user.user_name.canonical())
        .bind(user.profile.display_name.as_str())
        .bind(user.is_active)
        .bind(Json(UserDocument::from(user)))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AccountResult<Option<User>> {
        let row: Option<AccountRow> =
            sqlx::query_as("SELECT document FROM accounts WHERE user_id = $1")
                .bind(user_id.into_uuid())
                .fetch_optional(&self.pool)
                .await?;
        row.map(AccountRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>> {
        self.fetch_one_by("email_canonical", email.as_str()).await
    }

    async fn find_by_user_name(&self, canonical: &str) -> AccountResult<Option<User>> {
        self.fetch_one_by("user_name_canonical", canonical).await
    }

    async fn save(&self, user: &User) -> AccountResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email_canonical = $2,
                user_name_canonical = $3,
                display_name = $4,
                is_active = $5,
                document = $6,
                updated_at = $7
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.into_uuid())
        .bind(user.email.as_str())
        .bind(user.user_name.canonical())
        .bind(user.profile.display_name.as_str())
        .bind(user.is_active)
        .bind(Json(UserDocument::from(user)))
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::NotFound("User"));
        }
        Ok(())
    }

    async fn search(&self, term: &str, limit: usize) -> AccountResult<Vec<User>> {
        let rows: Vec<AccountRow> = sqlx::query_as(
            r#"
            SELECT document FROM accounts
            WHERE is_active
              AND (user_name_canonical ILIKE $1 ESCAPE '\' OR display_name ILIKE $1 ESCAPE '\')
            ORDER BY user_name_canonical
            LIMIT $2
            "#,
        )
        .bind(like_pattern(term))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountRow::into_user).collect()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    document: Json<UserDocument>,
}

impl AccountRow {
    fn into_user(self) -> AccountResult<User> {
        User::try_from(self.document.0)
    }
}
