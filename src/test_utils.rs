#[cfg(test)]
pub mod test_helpers {
    use crate::db::{create_pool, run_migrations};
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    pub struct TestContext {
        pub pool: SqlitePool,
        pub _temp_dir: TempDir,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let db_path = temp_dir.path().join("kanban.db");

            let pool = create_pool(&db_path).await.unwrap();
            run_migrations(&pool).await.unwrap();

            Self {
                pool,
                _temp_dir: temp_dir,
            }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }

        /// Count rows of `table` matching `column = value`
        pub async fn count_where(&self, table: &str, column: &str, value: &str) -> i64 {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?", table, column);
            sqlx::query_scalar(&sql)
                .bind(value)
                .fetch_one(&self.pool)
                .await
                .unwrap()
        }
    }
}
