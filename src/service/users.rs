use super::RequestValidator;
use crate::error::AppError;
use crate::model::{CreateUser, UpdateUser, User, UserFilters};
use crate::store::UserStore;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        UserService { store }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Insert a new user. The email pre-check gives a friendlier error than the
    /// store constraint; a concurrent insert that slips past it still maps to
    /// `DuplicateEmail`.
    pub async fn create(&self, input: CreateUser) -> Result<User, AppError> {
        RequestValidator::validate_create(&input)?;
        if self.store.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }
        let user = self.store.create(&input).await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn list(&self, filters: &UserFilters) -> Result<Vec<User>, AppError> {
        Ok(self.store.find_all(filters).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.store.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn update(&self, id: Uuid, patch: UpdateUser) -> Result<User, AppError> {
        RequestValidator::validate_update(&patch)?;
        if self.store.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if let Some(email) = &patch.email {
            if let Some(owner) = self.store.find_by_email(email).await? {
                if owner.id != id {
                    return Err(AppError::DuplicateEmail);
                }
            }
        }
        let user = self.store.update(id, &patch).await?.ok_or(AppError::NotFound)?;
        tracing::info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
