//! Shared application state for all routes.

use crate::service::UserService;
use crate::store::UserStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        AppState { users: UserService::new(store) }
    }
}
