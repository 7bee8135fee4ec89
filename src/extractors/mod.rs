//! Request extractors whose rejections are [`crate::error::AppError`]s, so
//! malformed input still gets a `{"error": ...}` body.

mod json;
mod user_id;
pub use json::ValidJson;
pub use user_id::UserId;
