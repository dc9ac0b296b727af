//! PostgreSQL user repository implementation
//!
//! Password hashing happens in the database through `pgcrypto`
//! (`crypt` with a blowfish salt), so plaintext never leaves the
//! statement parameters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserData, UserRepository};
use crate::domain::DomainError;

use super::repository::CREDENTIAL_MISMATCH;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const RETURNING_COLUMNS: &str = "id, full_name, phone_number, login_count, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, data: &UserData) -> Result<User, DomainError> {
        let query = format!(
            r#"
            INSERT INTO users (full_name, phone_number, password)
            VALUES ($1, $2, crypt($3, gen_salt('bf')))
            RETURNING {}
            "#,
            RETURNING_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&data.full_name)
            .bind(&data.phone_number)
            .bind(&data.password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "create user", &data.phone_number))?;

        row_to_user(&row)
    }

    async fn login(&self, phone_number: &str, password: &str) -> Result<User, DomainError> {
        let query = format!(
            r#"
            UPDATE users
            SET login_count = login_count + 1
            WHERE phone_number = $1
              AND password = crypt($2, password)
              AND is_active = TRUE
            RETURNING {}
            "#,
            RETURNING_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(phone_number)
            .bind(password)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to log in: {}", e)))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(DomainError::credential(CREDENTIAL_MISMATCH)),
        }
    }

    async fn get_user_by_id(&self, id: &str) -> Result<User, DomainError> {
        let uuid = parse_id(id)?;

        let query = format!(
            "SELECT {} FROM users WHERE id = $1 AND is_active = TRUE",
            RETURNING_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(user_not_found(id)),
        }
    }

    async fn patch_user_by_id(&self, id: &str, data: &UserData) -> Result<User, DomainError> {
        let uuid = parse_id(id)?;

        let mut builder = build_patch_query(data);
        builder
            .push(" WHERE id = ")
            .push_bind(uuid)
            .push(" AND is_active = TRUE RETURNING ")
            .push(RETURNING_COLUMNS);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "patch user", &data.phone_number))?;

        match row {
            Some(row) => row_to_user(&row),
            None => Err(user_not_found(id)),
        }
    }
}

/// `UPDATE ... SET` covering only the present fields
fn build_patch_query(data: &UserData) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE users SET updated_at = NOW()");

    if data.has_full_name() {
        builder.push(", full_name = ").push_bind(data.full_name.clone());
    }

    if data.has_phone_number() {
        builder
            .push(", phone_number = ")
            .push_bind(data.phone_number.clone());
    }

    if data.has_password() {
        builder
            .push(", password = crypt(")
            .push_bind(data.password.clone())
            .push(", gen_salt('bf'))");
    }

    builder
}

/// Ids are UUIDs; anything else cannot exist
fn parse_id(id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(id).map_err(|_| user_not_found(id))
}

fn user_not_found(id: &str) -> DomainError {
    DomainError::not_found(format!("User '{}' not found", id))
}

fn map_write_error(error: sqlx::Error, action: &str, phone_number: &str) -> DomainError {
    if let sqlx::Error::Database(db) = &error {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return DomainError::conflict(format!(
                "phone number '{}' already registered",
                phone_number
            ));
        }
    }

    DomainError::storage(format!("Failed to {}: {}", action, error))
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let id: Uuid = get_column(row, "id")?;
    let full_name: String = get_column(row, "full_name")?;
    let phone_number: String = get_column(row, "phone_number")?;
    let login_count: i32 = get_column(row, "login_count")?;
    let created_at: DateTime<Utc> = get_column(row, "created_at")?;
    let updated_at: DateTime<Utc> = get_column(row, "updated_at")?;

    Ok(User::restore(
        id.to_string(),
        full_name,
        phone_number,
        login_count,
        created_at,
        updated_at,
    ))
}

fn get_column<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", column, e)))
}
