use sqlx::{PgPool, postgres::PgExecutor};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::notifications::model::Notification;
use crate::utils::errors::AppError;

/// Listing is capped so a noisy account cannot drag the whole page down.
const LIST_CAP: i64 = 100;

pub struct NotificationService;

impl NotificationService {
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        is_read: Option<bool>,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"SELECT id, user_id, course_id, kind, title, content, is_read, created_at
               FROM notifications
               WHERE user_id = $1 AND ($2::boolean IS NULL OR is_read = $2)
               ORDER BY created_at DESC
               LIMIT $3"#,
        )
        .bind(user_id)
        .bind(is_read)
        .bind(LIST_CAP)
        .fetch_all(db)
        .await?;

        Ok(notifications)
    }

    pub async fn unread_count(db: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(count)
    }

    #[instrument(skip(db))]
    pub async fn mark_read(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Notification not found"
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn mark_all_read(db: &PgPool, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(db)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert a single notification. Accepts any executor so callers can run
    /// it inside their own transaction.
    pub async fn notify_user<'e, E>(
        executor: E,
        user_id: Uuid,
        course_id: Option<Uuid>,
        kind: &str,
        title: &str,
        content: &str,
    ) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"INSERT INTO notifications (user_id, course_id, kind, title, content)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(kind)
        .bind(title)
        .bind(content)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Fan a notification out to every student enrolled in a course.
    ///
    /// A single INSERT ... SELECT keeps the fan-out all-or-nothing whether or
    /// not the caller wraps it in a wider transaction. Returns the number of
    /// rows written.
    pub async fn notify_course_students<'e, E>(
        executor: E,
        course_id: Uuid,
        kind: &str,
        title: &str,
        content: &str,
    ) -> Result<u64, AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"INSERT INTO notifications (user_id, course_id, kind, title, content)
               SELECT e.user_id, $1, $2, $3, $4
               FROM enrollments e
               JOIN users u ON u.id = e.user_id
               WHERE e.course_id = $1 AND u.role = 'STUDENT'"#,
        )
        .bind(course_id)
        .bind(kind)
        .bind(title)
        .bind(content)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
