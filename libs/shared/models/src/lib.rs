pub mod auth;
pub mod authz;
pub mod error;
pub mod records;
