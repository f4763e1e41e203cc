use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::appeals::model::{
    Appeal, AppealFilterParams, AppealStatus, AppealWithContext, CreateAppealDto,
    RejectAppealDto,
};
use crate::modules::audit::service::AuditService;
use crate::modules::notifications::model::kinds;
use crate::modules::notifications::service::NotificationService;
use crate::modules::sessions::service::SessionService;
use crate::utils::errors::AppError;

pub struct AppealService;

impl AppealService {
    /// File an appeal against a recorded attendance status. The instructor
    /// gets a courtesy message plus a notification; the student gets a
    /// receipt notification.
    #[instrument(skip(db, dto), fields(session_id = %dto.session_id))]
    pub async fn create(
        db: &PgPool,
        student_id: Uuid,
        ip: Option<&str>,
        dto: CreateAppealDto,
    ) -> Result<Appeal, AppError> {
        let session = SessionService::get(db, dto.session_id).await?;

        let recorded = sqlx::query_scalar::<_, i16>(
            "SELECT status FROM attendances WHERE session_id = $1 AND student_id = $2",
        )
        .bind(dto.session_id)
        .bind(student_id)
        .fetch_optional(db)
        .await?;

        if recorded.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No attendance record exists for this session"
            )));
        }

        let pending_exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM appeals
               WHERE session_id = $1 AND student_id = $2 AND status = 'PENDING')"#,
        )
        .bind(dto.session_id)
        .bind(student_id)
        .fetch_one(db)
        .await?;

        if pending_exists {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A pending appeal already exists for this session"
            )));
        }

        let instructor_id =
            sqlx::query_scalar::<_, Uuid>("SELECT instructor_id FROM courses WHERE id = $1")
                .bind(session.course_id)
                .fetch_one(db)
                .await?;

        let mut tx = db.begin().await?;

        let appeal = sqlx::query_as::<_, Appeal>(
            r#"INSERT INTO appeals (session_id, student_id, course_id, message)
               VALUES ($1, $2, $3, $4)
               RETURNING id, session_id, student_id, course_id, message, status,
                         instructor_comment, resolved_at, created_at"#,
        )
        .bind(dto.session_id)
        .bind(student_id)
        .bind(session.course_id)
        .bind(&dto.message)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"INSERT INTO messages (sender_id, receiver_id, course_id, content)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(student_id)
        .bind(instructor_id)
        .bind(session.course_id)
        .bind(format!(
            "[Appeal, week {}] {}",
            session.week_number, dto.message
        ))
        .execute(&mut *tx)
        .await?;

        NotificationService::notify_user(
            &mut *tx,
            student_id,
            Some(session.course_id),
            kinds::APPEAL_RECEIVED,
            "Appeal received",
            &format!(
                "Your appeal for week {} of {} was received",
                session.week_number, session.course_title
            ),
        )
        .await?;

        NotificationService::notify_user(
            &mut *tx,
            instructor_id,
            Some(session.course_id),
            kinds::APPEAL_ACTION_NEEDED,
            "New attendance appeal",
            &format!(
                "A student appealed their week {} attendance in {}",
                session.week_number, session.course_title
            ),
        )
        .await?;

        tx.commit().await?;

        AuditService::record(
            db,
            Some(student_id),
            "APPEAL_SUBMITTED",
            "appeal",
            Some(appeal.id),
            &format!("Appealed week {} attendance", session.week_number),
            ip,
        )
        .await;

        Ok(appeal)
    }

    pub async fn my_appeals(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<AppealWithContext>, AppError> {
        let appeals = sqlx::query_as::<_, AppealWithContext>(
            r#"SELECT ap.id, ap.session_id, s.week_number, s.session_date,
                      ap.course_id, c.title AS course_title,
                      ap.student_id, u.email AS student_email, u.name AS student_name,
                      ap.message, ap.status, ap.instructor_comment,
                      a.status AS current_status, ap.resolved_at, ap.created_at
               FROM appeals ap
               JOIN class_sessions s ON s.id = ap.session_id
               JOIN courses c ON c.id = ap.course_id
               JOIN users u ON u.id = ap.student_id
               LEFT JOIN attendances a
                      ON a.session_id = ap.session_id AND a.student_id = ap.student_id
               WHERE ap.student_id = $1
               ORDER BY ap.created_at DESC"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(appeals)
    }

    /// Appeals across the instructor's own courses.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        instructor_id: Uuid,
        params: AppealFilterParams,
    ) -> Result<Vec<AppealWithContext>, AppError> {
        let appeals = sqlx::query_as::<_, AppealWithContext>(
            r#"SELECT ap.id, ap.session_id, s.week_number, s.session_date,
                      ap.course_id, c.title AS course_title,
                      ap.student_id, u.email AS student_email, u.name AS student_name,
                      ap.message, ap.status, ap.instructor_comment,
                      a.status AS current_status, ap.resolved_at, ap.created_at
               FROM appeals ap
               JOIN class_sessions s ON s.id = ap.session_id
               JOIN courses c ON c.id = ap.course_id
               JOIN users u ON u.id = ap.student_id
               LEFT JOIN attendances a
                      ON a.session_id = ap.session_id AND a.student_id = ap.student_id
               WHERE c.instructor_id = $1
                 AND ($2::appeal_status IS NULL OR ap.status = $2)
               ORDER BY ap.created_at DESC"#,
        )
        .bind(instructor_id)
        .bind(params.status)
        .fetch_all(db)
        .await?;

        Ok(appeals)
    }

    /// Explicit rejection. Granting an appeal goes through the attendance
    /// correction endpoint instead, which flips the disputed status.
    #[instrument(skip(db, dto))]
    pub async fn reject(
        db: &PgPool,
        instructor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
        dto: RejectAppealDto,
    ) -> Result<Appeal, AppError> {
        if dto.status != AppealStatus::Rejected {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only REJECTED is accepted here; resolve appeals via an attendance correction"
            )));
        }

        let (course_id, course_title, owner_id, student_id) =
            sqlx::query_as::<_, (Uuid, String, Uuid, Uuid)>(
                r#"SELECT c.id, c.title, c.instructor_id, ap.student_id
                   FROM appeals ap
                   JOIN courses c ON c.id = ap.course_id
                   WHERE ap.id = $1"#,
            )
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Appeal not found")))?;

        if owner_id != instructor_id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You are not the instructor of this course"
            )));
        }

        let mut tx = db.begin().await?;

        let appeal = sqlx::query_as::<_, Appeal>(
            r#"UPDATE appeals
               SET status = 'REJECTED', instructor_comment = $2, resolved_at = now()
               WHERE id = $1
               RETURNING id, session_id, student_id, course_id, message, status,
                         instructor_comment, resolved_at, created_at"#,
        )
        .bind(id)
        .bind(&dto.instructor_comment)
        .fetch_one(&mut *tx)
        .await?;

        NotificationService::notify_user(
            &mut *tx,
            student_id,
            Some(course_id),
            kinds::APPEAL_RESULT,
            "Appeal rejected",
            &format!("Your attendance appeal in {} was rejected", course_title),
        )
        .await?;

        tx.commit().await?;

        AuditService::record(
            db,
            Some(instructor_id),
            "APPEAL_REJECTED",
            "appeal",
            Some(id),
            "Rejected attendance appeal",
            ip,
        )
        .await;

        Ok(appeal)
    }
}
