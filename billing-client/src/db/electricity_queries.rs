use sqlx::SqlitePool;

use crate::domain::{ElectricityRecord, NewElectricityRecord};

const RECORD_COLUMNS: &str = r#"id, start, "end", rate, usage, amount, record_month, timestamp"#;

/// All records, newest first.
///
/// Rows sharing a timestamp fall back to descending `id`.
pub async fn list_records(pool: &SqlitePool) -> sqlx::Result<Vec<ElectricityRecord>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM electricity ORDER BY timestamp DESC, id DESC"
    );

    sqlx::query_as::<_, ElectricityRecord>(&sql)
        .fetch_all(pool)
        .await
}

/// Records whose `record_month` equals `month` exactly, newest first.
pub async fn records_for_month(
    pool: &SqlitePool,
    month: &str,
) -> sqlx::Result<Vec<ElectricityRecord>> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM electricity WHERE record_month = ?1 ORDER BY timestamp DESC, id DESC"
    );

    sqlx::query_as::<_, ElectricityRecord>(&sql)
        .bind(month)
        .fetch_all(pool)
        .await
}

/// Insert a record and return the id SQLite assigned to it.
pub async fn insert_record(pool: &SqlitePool, record: &NewElectricityRecord) -> sqlx::Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO electricity (start, "end", rate, usage, amount, record_month)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(record.start)
    .bind(record.end)
    .bind(record.rate)
    .bind(record.usage)
    .bind(record.amount)
    .bind(&record.record_month)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Delete the row with the largest id. Returns the number of rows removed,
/// which is 0 on an empty table.
pub async fn delete_last_record(pool: &SqlitePool) -> sqlx::Result<u64> {
    let result =
        sqlx::query("DELETE FROM electricity WHERE id = (SELECT MAX(id) FROM electricity)")
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}
