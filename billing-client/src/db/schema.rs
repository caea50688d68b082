use sqlx::SqlitePool;

/// `end` is quoted because it is an SQL keyword.
pub const ELECTRICITY_TABLE_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS electricity (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        start        REAL,
        "end"        REAL,
        rate         REAL,
        usage        REAL,
        amount       REAL,
        record_month TEXT,
        timestamp    DATETIME DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
    )
"#;

pub const RECORD_MONTH_INDEX_DDL: &str =
    "CREATE INDEX IF NOT EXISTS idx_electricity_record_month ON electricity (record_month)";

/// Create the `electricity` table and its index if they do not exist yet.
///
/// Safe to run on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(ELECTRICITY_TABLE_DDL).execute(pool).await?;
    sqlx::query(RECORD_MONTH_INDEX_DDL).execute(pool).await?;
    Ok(())
}
