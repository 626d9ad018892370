//! Admin SDK Directory integration for gdesk.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DirectoryClient, UserOrder, UserQuery, MY_CUSTOMER, USERS_LIMIT};
pub use error::DirectoryError;
pub use types::{DirectoryUser, UserName};
