//! Infrastructure layer - Storage, hashing and logging implementations

pub mod account;
pub mod logging;
