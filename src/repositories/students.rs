use sqlx::{PgExecutor, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::Student;
use crate::db::types::StudentStatus;

const COLUMNS: &str = "\
    id, name, email, hashed_password, seat_number, status, last_active, \
    attendance_verified, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_seat<'e>(
    executor: impl PgExecutor<'e>,
    seat_number: i32,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE seat_number = $1"))
        .bind(seat_number)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn exists_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM students WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_ordered(pool: &PgPool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students ORDER BY seat_number ASC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateStudent<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub email: &'a str,
    pub hashed_password: &'a str,
    pub seat_number: i32,
    pub now: PrimitiveDateTime,
}

pub(crate) async fn create<'e>(
    executor: impl PgExecutor<'e>,
    params: CreateStudent<'_>,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            id, name, email, hashed_password, seat_number, status,
            last_active, attendance_verified, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, 'online', $6, NULL, $6, $6)
        RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.seat_number)
    .bind(params.now)
    .fetch_one(executor)
    .await
}

/// Attach credentials to a bare code-login row, keeping its attendance state.
pub(crate) async fn claim_seat<'e>(
    executor: impl PgExecutor<'e>,
    id: &str,
    email: &str,
    hashed_password: &str,
    name: Option<&str>,
    now: PrimitiveDateTime,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "UPDATE students SET
            email = $1,
            hashed_password = $2,
            name = COALESCE($3, name),
            updated_at = $4
         WHERE id = $5
         RETURNING {COLUMNS}"
    ))
    .bind(email)
    .bind(hashed_password)
    .bind(name)
    .bind(now)
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Code-login upsert: first login for a seat provisions a bare row, later
/// logins refresh it. The seat uniqueness constraint arbitrates races.
pub(crate) async fn upsert_check_in(
    pool: &PgPool,
    id: &str,
    seat_number: i32,
    now: PrimitiveDateTime,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            id, name, email, hashed_password, seat_number, status,
            last_active, attendance_verified, created_at, updated_at
        ) VALUES ($1, NULL, NULL, NULL, $2, 'online', $3, $3, $3, $3)
        ON CONFLICT ON CONSTRAINT students_seat_number_key DO UPDATE SET
            status = 'online',
            last_active = EXCLUDED.last_active,
            attendance_verified = EXCLUDED.attendance_verified,
            updated_at = EXCLUDED.updated_at
        RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(seat_number)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update_status(
    pool: &PgPool,
    id: &str,
    status: StudentStatus,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE students SET status = $1, last_active = $2, updated_at = $2 WHERE id = $3",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn set_attendance_verified(
    pool: &PgPool,
    id: &str,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE students SET attendance_verified = $1, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students").execute(pool).await?;
    Ok(result.rows_affected())
}
