//! Shared fixtures for infra integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use quickstart_common::testing::TempDir;
use quickstart_infra::database::{DbManager, SqliteWorkspaceRepository};

/// Temporary migrated database wrapper that keeps the underlying file alive
/// for the duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    pub repository: Arc<SqliteWorkspaceRepository>,
    temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new("infra-test").expect("temp dir should be created");
        let db_path = temp_dir.path().join("quickstart.db");

        let manager = Arc::new(DbManager::new(&db_path, 4).expect("db manager should be created"));
        manager.run_migrations().expect("schema migrations should apply");
        let repository = Arc::new(SqliteWorkspaceRepository::new(Arc::clone(&manager)));

        Self { manager, repository, temp_dir }
    }

    /// Open a second manager on the same file, as a later CLI invocation would.
    pub fn reopen(&self) -> SqliteWorkspaceRepository {
        let manager = DbManager::new(self.manager.path(), 2).expect("reopen should succeed");
        manager.run_migrations().expect("migrations are idempotent");
        SqliteWorkspaceRepository::new(Arc::new(manager))
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    /// Single integer from a scalar query.
    pub fn scalar(&self, sql: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row(sql, &[], |row| row.get(0)).expect("scalar query should succeed")
    }

    pub fn dir(&self) -> &TempDir {
        &self.temp_dir
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn files(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|path| path.to_string()).collect()
}
