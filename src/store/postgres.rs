//! PostgreSQL-backed user store.

use super::UserStore;
use crate::error::StoreError;
use crate::model::{CreateUser, UpdateUser, User, UserFilters};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const COLUMNS: &str = "id, name, email, age, created_at, updated_at";

/// Open a pool and verify one connection can be acquired.
pub async fn connect(options: PgConnectOptions, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        PgUserStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `users` table if it does not exist. No other schema changes are made.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                age INTEGER,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT users_email_key UNIQUE (email)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Wrap a value for `ILIKE` so `%`, `_` and `\` match literally.
fn contains_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn select_list(filters: &UserFilters) -> QueryBuilder<'static, Postgres> {
    let mut q = QueryBuilder::new(format!("SELECT {} FROM users WHERE TRUE", COLUMNS));
    if let Some(name) = &filters.name {
        q.push(" AND name ILIKE ").push_bind(contains_pattern(name));
    }
    if let Some(email) = &filters.email {
        q.push(" AND email ILIKE ").push_bind(contains_pattern(email));
    }
    if let Some(age) = filters.age {
        q.push(" AND age = ").push_bind(age);
    }
    q.push(" ORDER BY created_at DESC");
    q
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (name, email, age) VALUES ($1, $2, $3) RETURNING {}",
            COLUMNS
        );
        tracing::debug!(email = %input.email, "insert user");
        sqlx::query_as::<_, User>(&sql)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.age)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_db)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_all(&self, filters: &UserFilters) -> Result<Vec<User>, StoreError> {
        let mut q = select_list(filters);
        tracing::debug!(sql = %q.sql(), ?filters, "query");
        let users = q.build_query_as::<User>().fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn update(&self, id: Uuid, patch: &UpdateUser) -> Result<Option<User>, StoreError> {
        // updated_at strictly increases, even for two updates within one clock tick.
        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                age = CASE WHEN $4 THEN $5 ELSE age END,
                updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        let (age_present, age) = match patch.age {
            Some(age) => (true, age),
            None => (false, None),
        };
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(patch.name.as_deref())
            .bind(patch.email.as_deref())
            .bind(age_present)
            .bind(age)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_db)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("john"), "%john%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn list_without_filters_only_orders() {
        let q = select_list(&UserFilters::default());
        assert_eq!(
            q.sql(),
            "SELECT id, name, email, age, created_at, updated_at FROM users WHERE TRUE ORDER BY created_at DESC"
        );
    }

    #[test]
    fn list_filters_are_anded_in_order() {
        let filters = UserFilters {
            name: Some("jo".into()),
            email: Some("example".into()),
            age: Some(30),
        };
        let q = select_list(&filters);
        assert!(q
            .sql()
            .ends_with("WHERE TRUE AND name ILIKE $1 AND email ILIKE $2 AND age = $3 ORDER BY created_at DESC"));
    }
}
