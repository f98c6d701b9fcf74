// ==========================================
// 缝制线生产跟踪系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键级联删除依赖 foreign_keys）
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 幂等建表，记录 schema_version
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库（测试/嵌入场景）并建表
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 表:
/// - config_kv: 系统配置
/// - employee: 员工档案（技能以 JSON 存储）
/// - input_record / input_size_shade: 投入记录及其尺码/色差行
/// - output_record / output_size_shade: 产出记录及其尺码/色差行
///
/// 列表顺序依赖 rowid（插入顺序），upsert 使用 ON CONFLICT DO UPDATE 保持 rowid 不变
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS employee (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            designation TEXT NOT NULL,
            line_number TEXT NOT NULL DEFAULT '',
            join_date TEXT,
            phone TEXT NOT NULL DEFAULT '',
            skills_json TEXT NOT NULL DEFAULT '[]',
            nid TEXT NOT NULL DEFAULT '',
            father_name TEXT NOT NULL DEFAULT '',
            mother_name TEXT NOT NULL DEFAULT '',
            is_married INTEGER NOT NULL DEFAULT 0,
            gender TEXT NOT NULL DEFAULT 'Male',
            blood_group TEXT NOT NULL DEFAULT '',
            division TEXT NOT NULL DEFAULT '',
            district TEXT NOT NULL DEFAULT '',
            upazila TEXT NOT NULL DEFAULT '',
            thana TEXT NOT NULL DEFAULT '',
            post_office TEXT NOT NULL DEFAULT '',
            village TEXT NOT NULL DEFAULT '',
            photo TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS input_record (
            id TEXT PRIMARY KEY,
            record_date TEXT,
            line_number TEXT NOT NULL,
            buyer TEXT NOT NULL,
            po TEXT NOT NULL,
            style TEXT NOT NULL,
            pf TEXT NOT NULL,
            color TEXT NOT NULL,
            sewing_finish_date TEXT,
            total_quantity INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS input_size_shade (
            input_id TEXT NOT NULL REFERENCES input_record(id) ON DELETE CASCADE,
            line_no INTEGER NOT NULL,
            size TEXT NOT NULL,
            shade TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (input_id, line_no)
        );

        CREATE TABLE IF NOT EXISTS output_record (
            id TEXT PRIMARY KEY,
            record_date TEXT,
            line_number TEXT NOT NULL,
            buyer TEXT NOT NULL,
            po TEXT NOT NULL,
            style TEXT NOT NULL,
            pf TEXT NOT NULL,
            color TEXT NOT NULL,
            sewing_finish_date TEXT,
            total_output_quantity INTEGER NOT NULL DEFAULT 0,
            total_balance_quantity INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS output_size_shade (
            output_id TEXT NOT NULL REFERENCES output_record(id) ON DELETE CASCADE,
            line_no INTEGER NOT NULL,
            size TEXT NOT NULL,
            shade TEXT NOT NULL,
            input_quantity INTEGER NOT NULL DEFAULT 0,
            output_quantity INTEGER NOT NULL DEFAULT 0,
            balance_quantity INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (output_id, line_no)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
