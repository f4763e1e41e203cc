use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::audit::service::AuditService;
use crate::modules::calendar::model::{CreateMakeupDayDto, Holiday, MakeupDay, UpsertHolidayDto};
use crate::modules::courses::service::CourseService;
use crate::utils::errors::AppError;

pub struct CalendarService;

impl CalendarService {
    pub async fn list_holidays(
        db: &PgPool,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Holiday>, AppError> {
        let holidays = sqlx::query_as::<_, Holiday>(
            r#"SELECT date, name, is_holiday
               FROM holidays
               WHERE ($1::date IS NULL OR date >= $1)
                 AND ($2::date IS NULL OR date <= $2)
               ORDER BY date"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;

        Ok(holidays)
    }

    /// Posting a date that already exists overwrites its name and flag.
    #[instrument(skip(db, dto))]
    pub async fn upsert_holiday(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        dto: UpsertHolidayDto,
    ) -> Result<Holiday, AppError> {
        let holiday = sqlx::query_as::<_, Holiday>(
            r#"INSERT INTO holidays (date, name, is_holiday)
               VALUES ($1, $2, $3)
               ON CONFLICT (date)
               DO UPDATE SET name = EXCLUDED.name, is_holiday = EXCLUDED.is_holiday
               RETURNING date, name, is_holiday"#,
        )
        .bind(dto.date)
        .bind(&dto.name)
        .bind(dto.is_holiday)
        .fetch_one(db)
        .await?;

        AuditService::record(
            db,
            Some(actor_id),
            "HOLIDAY_UPSERTED",
            "holiday",
            None,
            &format!("Set {} (holiday: {})", holiday.date, holiday.is_holiday),
            ip,
        )
        .await;

        Ok(holiday)
    }

    pub async fn list_makeup_days(
        db: &PgPool,
        instructor_id: Uuid,
        course_id: Uuid,
    ) -> Result<Vec<MakeupDay>, AppError> {
        CourseService::ensure_instructor(db, course_id, instructor_id).await?;

        let days = sqlx::query_as::<_, MakeupDay>(
            r#"SELECT id, course_id, week_number, original_date, makeup_date, reason, created_at
               FROM makeup_days
               WHERE course_id = $1
               ORDER BY makeup_date"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(days)
    }

    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn create_makeup_day(
        db: &PgPool,
        instructor_id: Uuid,
        ip: Option<&str>,
        dto: CreateMakeupDayDto,
    ) -> Result<MakeupDay, AppError> {
        CourseService::ensure_instructor(db, dto.course_id, instructor_id).await?;

        let day = sqlx::query_as::<_, MakeupDay>(
            r#"INSERT INTO makeup_days (course_id, week_number, original_date, makeup_date, reason)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, course_id, week_number, original_date, makeup_date, reason, created_at"#,
        )
        .bind(dto.course_id)
        .bind(dto.week_number)
        .bind(dto.original_date)
        .bind(dto.makeup_date)
        .bind(&dto.reason)
        .fetch_one(db)
        .await?;

        AuditService::record(
            db,
            Some(instructor_id),
            "MAKEUP_DAY_CREATED",
            "makeup_day",
            Some(day.id),
            &format!("Makeup {} for week {}", day.makeup_date, day.week_number),
            ip,
        )
        .await;

        Ok(day)
    }

    #[instrument(skip(db))]
    pub async fn delete_makeup_day(
        db: &PgPool,
        instructor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let course_id =
            sqlx::query_scalar::<_, Uuid>("SELECT course_id FROM makeup_days WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Makeup day not found")))?;

        CourseService::ensure_instructor(db, course_id, instructor_id).await?;

        sqlx::query("DELETE FROM makeup_days WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        AuditService::record(
            db,
            Some(instructor_id),
            "MAKEUP_DAY_DELETED",
            "makeup_day",
            Some(id),
            "Makeup day removed",
            ip,
        )
        .await;

        Ok(())
    }
}
