// ==========================================
// 打包运营工作台 - 状态持久化后端
// ==========================================
// 职责: 键值槽位的读写(订单快照 JSON + 最后更新时间)
// 说明: 后端通过 trait 注入,便于测试隔离;并发写同一槽位为后写覆盖
// ==========================================

use crate::store::error::{StoreError, StoreResult};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 订单快照槽位
pub const ORDERS_SLOT: &str = "packing_orders";
/// 最后更新时间槽位(ISO-8601)
pub const UPDATED_AT_SLOT: &str = "packing_orders_updated_at";

// ==========================================
// StateStore Trait
// ==========================================
// 用途: 持久化键值槽位接口
// 实现者: SqliteStateStore, MemoryStateStore
pub trait StateStore: Send + Sync {
    /// 写入槽位(覆盖语义)
    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// 读取槽位
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
}

// ==========================================
// SQLite 实现
// ==========================================
pub struct SqliteStateStore {
    conn: Mutex<Connection>,
}

impl SqliteStateStore {
    /// 打开指定路径的状态库(不存在则创建)
    pub fn new(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(db_path.as_ref())
            .map_err(|e| StoreError::DatabaseConnectionError(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 内存库(测试用)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::DatabaseConnectionError(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 缺省状态库路径: <数据目录>/packing-ops/state.db
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("packing-ops")
            .join("state.db")
    }

    /// 按缺省路径打开(目录不存在则创建)
    pub fn open_default() -> StoreResult<Self> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::PersistenceError(e.to_string()))?;
        }
        Self::new(path)
    }

    fn init_schema(conn: &Connection) -> StoreResult<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_slot (
                slot_key   TEXT PRIMARY KEY,
                slot_value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl StateStore for SqliteStateStore {
    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        conn.execute(
            "INSERT INTO kv_slot (slot_key, slot_value) VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET slot_value = excluded.slot_value",
            [key, value],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        let value = conn
            .query_row(
                "SELECT slot_value FROM kv_slot WHERE slot_key = ?1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

// ==========================================
// 内存实现(测试用)
// ==========================================
#[derive(Default)]
pub struct MemoryStateStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_put_get_roundtrip() {
        let store = SqliteStateStore::open_in_memory().unwrap();
        assert_eq!(store.get(ORDERS_SLOT).unwrap(), None);

        store.put(ORDERS_SLOT, "[]").unwrap();
        assert_eq!(store.get(ORDERS_SLOT).unwrap(), Some("[]".to_string()));

        // 覆盖语义
        store.put(ORDERS_SLOT, "[1]").unwrap();
        assert_eq!(store.get(ORDERS_SLOT).unwrap(), Some("[1]".to_string()));
    }

    #[test]
    fn test_sqlite_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db");

        {
            let store = SqliteStateStore::new(&db_path).unwrap();
            store.put(UPDATED_AT_SLOT, "2026-01-01T00:00:00Z").unwrap();
        }

        let store = SqliteStateStore::new(&db_path).unwrap();
        assert_eq!(
            store.get(UPDATED_AT_SLOT).unwrap(),
            Some("2026-01-01T00:00:00Z".to_string())
        );
    }

    #[test]
    fn test_memory_store_basic() {
        let store = MemoryStateStore::new();
        store.put("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert_eq!(store.get("missing").unwrap(), None);
    }
}
