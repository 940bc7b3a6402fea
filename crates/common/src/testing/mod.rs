//! Fixtures for integration tests in dependent crates (`test-utils` feature).

pub mod temp;

pub use temp::TempDir;
