use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::audit::service::AuditService;
use crate::modules::semesters::model::{CreateSemesterDto, Semester, UpdateSemesterDto};
use crate::utils::errors::{AppError, conflict_on_reference, conflict_on_unique};

pub struct SemesterService;

impl SemesterService {
    fn validate_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), AppError> {
        if start_date >= end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }
        Ok(())
    }

    pub async fn list(db: &PgPool) -> Result<Vec<Semester>, AppError> {
        let semesters = sqlx::query_as::<_, Semester>(
            r#"SELECT id, year, term, start_date, end_date, created_at, updated_at
               FROM semesters ORDER BY year DESC, term DESC"#,
        )
        .fetch_all(db)
        .await?;

        Ok(semesters)
    }

    #[instrument(skip(db, dto), fields(year = dto.year, term = dto.term))]
    pub async fn create(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        dto: CreateSemesterDto,
    ) -> Result<Semester, AppError> {
        Self::validate_range(dto.start_date, dto.end_date)?;

        let semester = sqlx::query_as::<_, Semester>(
            r#"INSERT INTO semesters (year, term, start_date, end_date)
               VALUES ($1, $2, $3, $4)
               RETURNING id, year, term, start_date, end_date, created_at, updated_at"#,
        )
        .bind(dto.year)
        .bind(dto.term)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await
        .map_err(|e| conflict_on_unique(e, "A semester for this year and term already exists"))?;

        AuditService::record(
            db,
            Some(actor_id),
            "SEMESTER_CREATED",
            "semester",
            Some(semester.id),
            &format!("Created semester {}-{}", semester.year, semester.term),
            ip,
        )
        .await;

        Ok(semester)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
        dto: UpdateSemesterDto,
    ) -> Result<Semester, AppError> {
        Self::validate_range(dto.start_date, dto.end_date)?;

        let semester = sqlx::query_as::<_, Semester>(
            r#"UPDATE semesters
               SET year = $2, term = $3, start_date = $4, end_date = $5, updated_at = now()
               WHERE id = $1
               RETURNING id, year, term, start_date, end_date, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.year)
        .bind(dto.term)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_optional(db)
        .await
        .map_err(|e| conflict_on_unique(e, "A semester for this year and term already exists"))?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Semester not found")))?;

        AuditService::record(
            db,
            Some(actor_id),
            "SEMESTER_UPDATED",
            "semester",
            Some(semester.id),
            &format!("Updated semester {}-{}", semester.year, semester.term),
            ip,
        )
        .await;

        Ok(semester)
    }

    #[instrument(skip(db))]
    pub async fn delete(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM semesters WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| conflict_on_reference(e, "Semester is still referenced by courses"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Semester not found")));
        }

        AuditService::record(
            db,
            Some(actor_id),
            "SEMESTER_DELETED",
            "semester",
            Some(id),
            "Deleted semester",
            ip,
        )
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_and_empty_ranges() {
        assert!(SemesterService::validate_range(date(2026, 3, 1), date(2026, 6, 20)).is_ok());
        assert!(SemesterService::validate_range(date(2026, 6, 20), date(2026, 3, 1)).is_err());
        assert!(SemesterService::validate_range(date(2026, 3, 1), date(2026, 3, 1)).is_err());
    }
}
