use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::attendance::model::status;
use crate::modules::attendance::service::AttendanceService;
use crate::modules::audit::service::AuditService;
use crate::modules::excuses::model::{
    ExcuseFilterParams, ExcuseRequest, ExcuseStatus, ExcuseWithContext, NewExcuse,
    ReviewExcuseDto,
};
use crate::modules::notifications::model::kinds;
use crate::modules::notifications::service::NotificationService;
use crate::modules::sessions::service::SessionService;
use crate::utils::errors::{AppError, conflict_on_unique};

pub struct ExcuseService;

impl ExcuseService {
    #[instrument(skip(db, new))]
    pub async fn create(
        db: &PgPool,
        student_id: Uuid,
        ip: Option<&str>,
        session_id: Uuid,
        new: NewExcuse,
    ) -> Result<ExcuseRequest, AppError> {
        let session = SessionService::get(db, session_id).await?;
        AttendanceService::ensure_enrolled(db, session.course_id, student_id).await?;

        let excuse = sqlx::query_as::<_, ExcuseRequest>(
            r#"INSERT INTO excuse_requests (session_id, student_id, reason_code, reason, file_path)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, session_id, student_id, reason_code, reason, file_path,
                         status, instructor_comment, created_at, updated_at"#,
        )
        .bind(session_id)
        .bind(student_id)
        .bind(&new.reason_code)
        .bind(&new.reason)
        .bind(&new.file_path)
        .fetch_one(db)
        .await
        .map_err(|e| {
            conflict_on_unique(e, "An excuse request for this session already exists")
        })?;

        let instructor_id =
            sqlx::query_scalar::<_, Uuid>("SELECT instructor_id FROM courses WHERE id = $1")
                .bind(session.course_id)
                .fetch_one(db)
                .await?;

        NotificationService::notify_user(
            db,
            instructor_id,
            Some(session.course_id),
            kinds::EXCUSE_PENDING,
            "New excuse request",
            &format!(
                "A student submitted an excuse for week {} of {}",
                session.week_number, session.course_title
            ),
        )
        .await?;

        AuditService::record(
            db,
            Some(student_id),
            "EXCUSE_SUBMITTED",
            "excuse_request",
            Some(excuse.id),
            &format!("Submitted excuse for week {} session", session.week_number),
            ip,
        )
        .await;

        Ok(excuse)
    }

    pub async fn my_excuses(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<ExcuseWithContext>, AppError> {
        let excuses = sqlx::query_as::<_, ExcuseWithContext>(
            r#"SELECT x.id, x.session_id, s.week_number, s.session_date,
                      c.id AS course_id, c.title AS course_title,
                      x.student_id, u.email AS student_email, u.name AS student_name,
                      x.reason_code, x.reason, x.file_path, x.status,
                      x.instructor_comment, x.created_at
               FROM excuse_requests x
               JOIN class_sessions s ON s.id = x.session_id
               JOIN courses c ON c.id = s.course_id
               JOIN users u ON u.id = x.student_id
               WHERE x.student_id = $1
               ORDER BY x.created_at DESC"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(excuses)
    }

    /// Requests across the caller's courses; admins see every course.
    #[instrument(skip(db, auth_user))]
    pub async fn list(
        db: &PgPool,
        auth_user: &AuthUser,
        params: ExcuseFilterParams,
    ) -> Result<Vec<ExcuseWithContext>, AppError> {
        let instructor_filter = if auth_user.is_admin() {
            None
        } else {
            Some(auth_user.user_id()?)
        };

        let excuses = sqlx::query_as::<_, ExcuseWithContext>(
            r#"SELECT x.id, x.session_id, s.week_number, s.session_date,
                      c.id AS course_id, c.title AS course_title,
                      x.student_id, u.email AS student_email, u.name AS student_name,
                      x.reason_code, x.reason, x.file_path, x.status,
                      x.instructor_comment, x.created_at
               FROM excuse_requests x
               JOIN class_sessions s ON s.id = x.session_id
               JOIN courses c ON c.id = s.course_id
               JOIN users u ON u.id = x.student_id
               WHERE ($1::uuid IS NULL OR c.instructor_id = $1)
                 AND ($2::excuse_status IS NULL OR x.status = $2)
                 AND ($3::uuid IS NULL OR c.id = $3)
               ORDER BY x.created_at DESC"#,
        )
        .bind(instructor_filter)
        .bind(params.status)
        .bind(params.course_id)
        .fetch_all(db)
        .await?;

        Ok(excuses)
    }

    /// Approve or reject a request. Approval also marks the attendance cell
    /// excused, in the same transaction as the status change.
    #[instrument(skip(db, dto))]
    pub async fn review(
        db: &PgPool,
        instructor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
        dto: ReviewExcuseDto,
    ) -> Result<ExcuseRequest, AppError> {
        if dto.status == ExcuseStatus::Pending {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Review status must be APPROVED or REJECTED"
            )));
        }

        let (session_id, student_id, course_id, course_title, owner_id) =
            sqlx::query_as::<_, (Uuid, Uuid, Uuid, String, Uuid)>(
                r#"SELECT x.session_id, x.student_id, c.id, c.title, c.instructor_id
                   FROM excuse_requests x
                   JOIN class_sessions s ON s.id = x.session_id
                   JOIN courses c ON c.id = s.course_id
                   WHERE x.id = $1"#,
            )
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Excuse request not found")))?;

        if owner_id != instructor_id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You are not the instructor of this course"
            )));
        }

        let mut tx = db.begin().await?;

        let excuse = sqlx::query_as::<_, ExcuseRequest>(
            r#"UPDATE excuse_requests
               SET status = $2, instructor_comment = $3, updated_at = now()
               WHERE id = $1
               RETURNING id, session_id, student_id, reason_code, reason, file_path,
                         status, instructor_comment, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(&dto.instructor_comment)
        .fetch_one(&mut *tx)
        .await?;

        if dto.status == ExcuseStatus::Approved {
            sqlx::query(
                r#"INSERT INTO attendances (session_id, student_id, status)
                   VALUES ($1, $2, $3)
                   ON CONFLICT (session_id, student_id)
                   DO UPDATE SET status = EXCLUDED.status, checked_at = now()"#,
            )
            .bind(session_id)
            .bind(student_id)
            .bind(status::EXCUSED)
            .execute(&mut *tx)
            .await?;
        }

        let outcome = match dto.status {
            ExcuseStatus::Approved => "approved",
            _ => "rejected",
        };

        NotificationService::notify_user(
            &mut *tx,
            student_id,
            Some(course_id),
            kinds::EXCUSE_RESULT,
            "Excuse request reviewed",
            &format!("Your excuse request for {} was {}", course_title, outcome),
        )
        .await?;

        tx.commit().await?;

        AuditService::record(
            db,
            Some(instructor_id),
            "EXCUSE_REVIEWED",
            "excuse_request",
            Some(id),
            &format!("Excuse request {}", outcome),
            ip,
        )
        .await;

        Ok(excuse)
    }
}
