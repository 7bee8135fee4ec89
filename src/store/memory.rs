//! In-process user store. Enforces the same uniqueness and ordering rules as the
//! PostgreSQL schema; used by the HTTP tests and for running without a database.

use super::UserStore;
use crate::error::StoreError;
use crate::model::{CreateUser, UpdateUser, User, UserFilters};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryUserStore {
    // Insertion order; newest last.
    rows: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filters(user: &User, filters: &UserFilters) -> bool {
    filters.name.as_deref().map_or(true, |n| contains_ci(&user.name, n))
        && filters.email.as_deref().map_or(true, |e| contains_ci(&user.email, e))
        && filters.age.map_or(true, |a| user.age == Some(a))
}

/// Timestamps from `Utc::now()` can repeat; keep them strictly increasing.
fn next_timestamp(after: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match after {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

fn email_conflict() -> StoreError {
    StoreError::ConstraintViolation("users_email_key".to_string())
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.email == input.email) {
            return Err(email_conflict());
        }
        let now = next_timestamp(rows.last().map(|u| u.created_at));
        let user = User {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            email: input.email.clone(),
            age: input.age,
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self, filters: &UserFilters) -> Result<Vec<User>, StoreError> {
        let rows = self.rows.read().await;
        let mut out: Vec<User> = rows.iter().rev().filter(|u| matches_filters(u, filters)).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn update(&self, id: Uuid, patch: &UpdateUser) -> Result<Option<User>, StoreError> {
        let mut rows = self.rows.write().await;
        let Some(pos) = rows.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &patch.email {
            if rows.iter().any(|u| u.id != id && &u.email == email) {
                return Err(email_conflict());
            }
        }
        let user = &mut rows[pos];
        if let Some(name) = &patch.name {
            user.name = name.clone();
        }
        if let Some(email) = &patch.email {
            user.email = email.clone();
        }
        if let Some(age) = patch.age {
            user.age = age;
        }
        user.updated_at = next_timestamp(Some(user.updated_at));
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok(rows.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
