/*
  本地存储（SQLite）：
  - 需求要求：
    1) 单一数据库文件：应用只管理一个 `encrypted_data.db`
    2) 单表 messages(id INTEGER PRIMARY KEY AUTOINCREMENT, encrypted TEXT NOT NULL)
    3) 三种操作：插入一条 / 按 id 倒序查全部 / 清空全表（返回删除条数）
    4) 启动时打开（或创建）数据库并建表；失败属于致命错误，由入口层提示后退出
  - 设计说明：
    - 连接由 AppState 持有（Mutex 串行化），本模块只负责路径解析与具体 SQL；
    - 每个操作都是单条语句，不存在部分失败状态，因此不需要事务；
    - 表里存的是编码后的密文原样，解码展示由上层（commands）负责。

  文件与格式：
  - 存储路径：AppData/encrypted_data.db
*/

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tauri::{AppHandle, Manager};

/// 数据库文件名（固定单文件）。
const DB_FILENAME: &str = "encrypted_data.db";

/// 一条已入库的记录：id 自增，encrypted 为编码后的文本原样。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub encrypted: String,
}

/// 存储相关错误：统一转成字符串返回给前端。
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "file system error: {e}"),
            StorageError::Sqlite(e) => write!(f, "database error: {e}"),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// 获取数据库文件路径（AppData）。
pub fn database_path(app: &AppHandle) -> Result<PathBuf, StorageError> {
    let base = app
        .path()
        .app_data_dir()
        .map_err(|e| StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    Ok(base.join(DB_FILENAME))
}

/// 打开（或创建）数据库并确保表存在。
pub fn open(app: &AppHandle) -> Result<Connection, StorageError> {
    let path = database_path(app)?;
    open_at(&path)
}

/// 按指定路径打开数据库：父目录不存在则先创建。
pub fn open_at(path: &Path) -> Result<Connection, StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 建表（幂等）：表已存在时什么都不做。
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS messages (id INTEGER PRIMARY KEY AUTOINCREMENT, encrypted TEXT NOT NULL)",
        [],
    )?;
    Ok(())
}

/// 插入一条记录（encrypted 为编码后的文本）。
pub fn insert_message(conn: &Connection, token: &str) -> Result<(), StorageError> {
    conn.execute("INSERT INTO messages (encrypted) VALUES (?1)", params![token])?;
    Ok(())
}

/// 查询全部记录：按 id 倒序（最新的在最前面）。
pub fn list_messages(conn: &Connection) -> Result<Vec<StoredRecord>, StorageError> {
    let mut stmt = conn.prepare("SELECT id, encrypted FROM messages ORDER BY id DESC")?;
    let rows = stmt.query_map([], |row| {
        Ok(StoredRecord {
            id: row.get(0)?,
            encrypted: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// 清空全表：返回删除的条数（空表返回 0，不算错误）。
pub fn clear_messages(conn: &Connection) -> Result<usize, StorageError> {
    let deleted = conn.execute("DELETE FROM messages", [])?;
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_codec;

    fn open_in_memory() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory database");
        init_schema(&conn).expect("init schema");
        conn
    }

    #[test]
    fn list_returns_inserted_records_newest_first() {
        let conn = open_in_memory();
        insert_message(&conn, &text_codec::encode_text("a")).unwrap();
        insert_message(&conn, &text_codec::encode_text("b")).unwrap();

        let records = list_messages(&conn).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(text_codec::decode_text(&records[0].encrypted), "b");
        assert_eq!(text_codec::decode_text(&records[1].encrypted), "a");
        assert!(records[0].id > records[1].id);
    }

    #[test]
    fn stored_token_decodes_back_to_original() {
        let conn = open_in_memory();
        insert_message(&conn, &text_codec::encode_text("hello")).unwrap();

        let records = list_messages(&conn).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(text_codec::decode_text(&records[0].encrypted), "hello");
    }

    #[test]
    fn clear_reports_exact_deleted_count() {
        let conn = open_in_memory();
        for text in ["one", "two", "three"] {
            insert_message(&conn, &text_codec::encode_text(text)).unwrap();
        }

        assert_eq!(clear_messages(&conn).unwrap(), 3);
        assert!(list_messages(&conn).unwrap().is_empty());
    }

    #[test]
    fn clear_on_empty_table_is_zero_and_not_an_error() {
        let conn = open_in_memory();
        assert_eq!(clear_messages(&conn).unwrap(), 0);
    }

    #[test]
    fn init_schema_is_idempotent() {
        let conn = open_in_memory();
        insert_message(&conn, &text_codec::encode_text("keep")).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(list_messages(&conn).unwrap().len(), 1);
    }

    #[test]
    fn open_at_creates_parent_directory_and_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("nested").join("encrypted_data.db");

        {
            let conn = open_at(&path).unwrap();
            insert_message(&conn, &text_codec::encode_text("persisted")).unwrap();
        }
        assert!(path.exists());

        // 重新打开：建表幂等，数据仍在。
        let conn = open_at(&path).unwrap();
        let records = list_messages(&conn).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(text_codec::decode_text(&records[0].encrypted), "persisted");
    }
}
