mod env;

pub use env::{Config, DbConfig};
