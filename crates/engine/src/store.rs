//! Durable key/value storage behind the ledger.
//!
//! The engine only needs `get`, `set` and `remove` on string keys. `apply`
//! groups the writes of one ledger operation so a backend that supports it
//! can commit them together.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveValue, ConnectionTrait, Database, DatabaseConnection, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::{EngineError, ResultEngine};

/// A single pending write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StoreWrite {
    pub fn set(key: &str, value: String) -> Self {
        Self::Set {
            key: key.to_string(),
            value,
        }
    }

    pub fn remove(key: &str) -> Self {
        Self::Remove {
            key: key.to_string(),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> ResultEngine<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> ResultEngine<()>;

    async fn remove(&self, key: &str) -> ResultEngine<()>;

    /// Commits `writes` in order. The default is one call per write; backends
    /// with transactions override it to make the batch all-or-nothing.
    async fn apply(&self, writes: Vec<StoreWrite>) -> ResultEngine<()> {
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => self.set(&key, &value).await?,
                StoreWrite::Remove { key } => self.remove(&key).await?,
            }
        }
        Ok(())
    }
}

/// Process-local store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(Mutex::new(map)),
        }
    }

    fn lock(&self) -> ResultEngine<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| EngineError::Store("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> ResultEngine<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> ResultEngine<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> ResultEngine<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn apply(&self, writes: Vec<StoreWrite>) -> ResultEngine<()> {
        let mut entries = self.lock()?;
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => {
                    entries.insert(key, value);
                }
                StoreWrite::Remove { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

pub(crate) mod kv_entries {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "kv_entries")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub key: String,
        #[sea_orm(column_type = "Text")]
        pub value: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// SQLite-backed store, one row per key in `kv_entries`.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    database: DatabaseConnection,
}

impl SqliteStore {
    /// Connect to `url` (e.g. `sqlite:./coinstreak.db?mode=rwc`) and run
    /// pending migrations.
    pub async fn connect(url: &str) -> ResultEngine<Self> {
        let database = Database::connect(url).await?;
        Migrator::up(&database, None).await?;
        Ok(Self { database })
    }
}

async fn upsert<C: ConnectionTrait>(conn: &C, key: &str, value: &str) -> ResultEngine<()> {
    let model = kv_entries::ActiveModel {
        key: ActiveValue::Set(key.to_string()),
        value: ActiveValue::Set(value.to_string()),
    };
    kv_entries::Entity::insert(model)
        .on_conflict(
            OnConflict::column(kv_entries::Column::Key)
                .update_column(kv_entries::Column::Value)
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn delete<C: ConnectionTrait>(conn: &C, key: &str) -> ResultEngine<()> {
    kv_entries::Entity::delete_by_id(key.to_string())
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, key: &str) -> ResultEngine<Option<String>> {
        let model = kv_entries::Entity::find_by_id(key.to_string())
            .one(&self.database)
            .await?;
        Ok(model.map(|m| m.value))
    }

    async fn set(&self, key: &str, value: &str) -> ResultEngine<()> {
        upsert(&self.database, key, value).await
    }

    async fn remove(&self, key: &str) -> ResultEngine<()> {
        delete(&self.database, key).await
    }

    async fn apply(&self, writes: Vec<StoreWrite>) -> ResultEngine<()> {
        let db_tx = self.database.begin().await?;
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => upsert(&db_tx, &key, &value).await?,
                StoreWrite::Remove { key } => delete(&db_tx, &key).await?,
            }
        }
        db_tx.commit().await?;
        Ok(())
    }
}
