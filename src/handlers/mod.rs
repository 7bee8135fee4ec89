//! HTTP handlers for user CRUD.

pub mod users;
