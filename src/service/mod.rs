//! UserService: validation and lookup semantics on top of a [`crate::store::UserStore`].

mod users;
mod validation;
pub use users::UserService;
pub use validation::{RequestValidator, MAX_TEXT_LEN};
