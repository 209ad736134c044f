pub use sea_orm_migration::prelude::*;

mod m20240101_000000_kv_entries;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000000_kv_entries::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, Database, Statement};

    use super::*;

    #[tokio::test]
    async fn up_creates_kv_entries() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO kv_entries (key, value) VALUES (?, ?)",
            vec!["walletBalance".into(), "0".into()],
        ))
        .await
        .unwrap();

        let row = db
            .query_one(Statement::from_string(
                backend,
                "SELECT value FROM kv_entries WHERE key = 'walletBalance'",
            ))
            .await
            .unwrap()
            .unwrap();
        let value: String = row.try_get("", "value").unwrap();
        assert_eq!(value, "0");
    }
}
