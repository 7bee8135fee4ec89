//! User entity and the request shapes derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A persisted user row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<i32>,
}

/// Partial update. `None` leaves the column untouched.
///
/// `age` is nullable, so it carries a second level: `Some(None)` clears it,
/// `Some(Some(n))` sets it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub age: Option<Option<i32>>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}

/// Distinguish `"field": null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// List filters; all supplied filters are ANDed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserFilters {
    /// Case-insensitive substring of `name`.
    pub name: Option<String>,
    /// Case-insensitive substring of `email`.
    pub email: Option<String>,
    pub age: Option<i32>,
}
