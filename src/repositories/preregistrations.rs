use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::db::models::PreRegisteredStudent;

const COLUMNS: &str = "id, name, seat_number, created_at";

pub(crate) async fn list_ordered(
    pool: &PgPool,
) -> Result<Vec<PreRegisteredStudent>, sqlx::Error> {
    sqlx::query_as::<_, PreRegisteredStudent>(&format!(
        "SELECT {COLUMNS} FROM pre_registered_students ORDER BY seat_number ASC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_seat<'e>(
    executor: impl PgExecutor<'e>,
    seat_number: i32,
) -> Result<Option<PreRegisteredStudent>, sqlx::Error> {
    sqlx::query_as::<_, PreRegisteredStudent>(&format!(
        "SELECT {COLUMNS} FROM pre_registered_students WHERE seat_number = $1"
    ))
    .bind(seat_number)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn upsert(
    pool: &PgPool,
    name: &str,
    seat_number: i32,
    now: PrimitiveDateTime,
) -> Result<PreRegisteredStudent, sqlx::Error> {
    sqlx::query_as::<_, PreRegisteredStudent>(&format!(
        "INSERT INTO pre_registered_students (id, name, seat_number, created_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT ON CONSTRAINT pre_registered_students_seat_number_key
         DO UPDATE SET name = EXCLUDED.name
         RETURNING {COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(seat_number)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete_by_seat<'e>(
    executor: impl PgExecutor<'e>,
    seat_number: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pre_registered_students WHERE seat_number = $1")
        .bind(seat_number)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Atomically drop the whole roster and load the new one. Entries that repeat
/// a seat number are skipped, not overwritten.
pub(crate) async fn replace_all(
    pool: &PgPool,
    entries: &[(String, i32)],
    now: PrimitiveDateTime,
) -> Result<Vec<PreRegisteredStudent>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM pre_registered_students").execute(&mut *tx).await?;

    if !entries.is_empty() {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO pre_registered_students (id, name, seat_number, created_at) ",
        );
        builder.push_values(entries, |mut row, (name, seat_number)| {
            row.push_bind(Uuid::new_v4().to_string())
                .push_bind(name)
                .push_bind(seat_number)
                .push_bind(now);
        });
        builder.push(" ON CONFLICT ON CONSTRAINT pre_registered_students_seat_number_key DO NOTHING");
        builder.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    list_ordered(pool).await
}
