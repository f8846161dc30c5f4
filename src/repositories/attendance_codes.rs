use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::AttendanceCode;

/// Well-known key of the singleton codes row.
pub(crate) const SINGLETON_ID: &str = "default";

const COLUMNS: &str = "id, morning_code, afternoon_code, updated_at";

pub(crate) async fn get(pool: &PgPool) -> Result<Option<AttendanceCode>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceCode>(&format!(
        "SELECT {COLUMNS} FROM attendance_codes WHERE id = $1"
    ))
    .bind(SINGLETON_ID)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn upsert(
    pool: &PgPool,
    morning_code: Option<&str>,
    afternoon_code: Option<&str>,
    now: PrimitiveDateTime,
) -> Result<AttendanceCode, sqlx::Error> {
    sqlx::query_as::<_, AttendanceCode>(&format!(
        "INSERT INTO attendance_codes (id, morning_code, afternoon_code, updated_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE SET
            morning_code = EXCLUDED.morning_code,
            afternoon_code = EXCLUDED.afternoon_code,
            updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}"
    ))
    .bind(SINGLETON_ID)
    .bind(morning_code)
    .bind(afternoon_code)
    .bind(now)
    .fetch_one(pool)
    .await
}
