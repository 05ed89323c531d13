//! Disposable infrastructure for integration tests: MySQL and Redis
//! containers plus an in-process HTTP stub for provider endpoints.

pub mod error;
pub mod http;
pub mod mysql;
pub mod redis;

pub use error::{Result, TestInfraError};
