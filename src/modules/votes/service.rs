use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::audit::service::AuditService;
use crate::modules::courses::service::CourseService;
use crate::modules::notifications::model::kinds;
use crate::modules::notifications::service::NotificationService;
use crate::modules::votes::model::{
    CreateVoteDto, RespondDto, StudentVote, Vote, VoteResponseRecord,
};
use crate::utils::errors::AppError;

pub struct VoteService;

impl VoteService {
    /// Open a vote for one week of a course. The vote date is the week's
    /// first scheduled session; a proposed makeup day is stored alongside.
    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn create(
        db: &PgPool,
        instructor_id: Uuid,
        ip: Option<&str>,
        dto: CreateVoteDto,
    ) -> Result<Vote, AppError> {
        CourseService::ensure_instructor(db, dto.course_id, instructor_id).await?;

        let vote_date = sqlx::query_scalar::<_, Option<NaiveDate>>(
            "SELECT MIN(session_date) FROM class_sessions WHERE course_id = $1 AND week_number = $2",
        )
        .bind(dto.course_id)
        .bind(dto.week_number)
        .fetch_one(db)
        .await?;

        let mut tx = db.begin().await?;

        let vote = sqlx::query_as::<_, Vote>(
            r#"INSERT INTO votes (course_id, instructor_id, title, description, vote_date)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, course_id, instructor_id, title, description, vote_date,
                         is_closed, created_at"#,
        )
        .bind(dto.course_id)
        .bind(instructor_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(vote_date)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(makeup_date) = dto.makeup_date {
            sqlx::query(
                r#"INSERT INTO makeup_days (course_id, week_number, original_date, makeup_date, reason)
                   VALUES ($1, $2, $3, $4, $5)"#,
            )
            .bind(dto.course_id)
            .bind(dto.week_number)
            .bind(vote_date)
            .bind(makeup_date)
            .bind(&dto.makeup_reason)
            .execute(&mut *tx)
            .await?;
        }

        NotificationService::notify_course_students(
            &mut *tx,
            dto.course_id,
            kinds::VOTE_CREATED,
            "New class vote",
            &format!("Please respond to the vote: {}", dto.title),
        )
        .await?;

        tx.commit().await?;

        AuditService::record(
            db,
            Some(instructor_id),
            "VOTE_CREATED",
            "vote",
            Some(vote.id),
            &format!("Opened vote '{}' for week {}", vote.title, dto.week_number),
            ip,
        )
        .await;

        Ok(vote)
    }

    /// Open votes across the student's enrolled courses with their answer.
    pub async fn student_votes(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<StudentVote>, AppError> {
        let votes = sqlx::query_as::<_, StudentVote>(
            r#"SELECT v.id, v.course_id, c.title AS course_title, v.title, v.description,
                      v.vote_date, vr.response AS my_response, v.created_at
               FROM votes v
               JOIN courses c ON c.id = v.course_id
               JOIN enrollments e ON e.course_id = v.course_id AND e.user_id = $1
               LEFT JOIN vote_responses vr ON vr.vote_id = v.id AND vr.student_id = $1
               WHERE v.is_closed = FALSE
               ORDER BY v.created_at DESC"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(votes)
    }

    #[instrument(skip(db, dto))]
    pub async fn respond(
        db: &PgPool,
        student_id: Uuid,
        vote_id: Uuid,
        dto: RespondDto,
    ) -> Result<VoteResponseRecord, AppError> {
        let (course_id, is_closed) = sqlx::query_as::<_, (Uuid, bool)>(
            "SELECT course_id, is_closed FROM votes WHERE id = $1",
        )
        .bind(vote_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Vote not found")))?;

        if is_closed {
            return Err(AppError::forbidden(anyhow::anyhow!("This vote is closed")));
        }

        let enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(db)
        .await?;

        if !enrolled {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You are not enrolled in this course"
            )));
        }

        let record = sqlx::query_as::<_, VoteResponseRecord>(
            r#"INSERT INTO vote_responses (vote_id, student_id, response)
               VALUES ($1, $2, $3)
               ON CONFLICT (vote_id, student_id)
               DO UPDATE SET response = EXCLUDED.response, created_at = now()
               RETURNING vote_id, student_id, response, created_at"#,
        )
        .bind(vote_id)
        .bind(student_id)
        .bind(dto.response)
        .fetch_one(db)
        .await?;

        Ok(record)
    }
}
