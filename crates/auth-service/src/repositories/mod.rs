//! Persistence for user records.

pub mod users;

pub use users::{InMemoryUserStore, NewUser, PgUserStore, User, UserStore};
