use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::messages::model::{Message, MessageRoom, SendMessageDto};
use crate::modules::notifications::model::kinds;
use crate::modules::notifications::service::NotificationService;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

pub struct MessageService;

impl MessageService {
    /// Conversations the user takes part in, one row per (peer, course),
    /// carrying the most recent message. Newest conversation first.
    pub async fn rooms(db: &PgPool, user_id: Uuid) -> Result<Vec<MessageRoom>, AppError> {
        let rooms = sqlx::query_as::<_, MessageRoom>(
            r#"SELECT DISTINCT ON (peer_id, m.course_id)
                      CASE WHEN m.sender_id = $1 THEN m.receiver_id ELSE m.sender_id END AS peer_id,
                      u.name AS peer_name,
                      m.course_id,
                      c.title AS course_title,
                      m.content AS last_content,
                      m.sender_id AS last_sender_id,
                      m.created_at AS last_at
               FROM messages m
               JOIN users u
                 ON u.id = CASE WHEN m.sender_id = $1 THEN m.receiver_id ELSE m.sender_id END
               LEFT JOIN courses c ON c.id = m.course_id
               WHERE m.sender_id = $1 OR m.receiver_id = $1
               ORDER BY peer_id, m.course_id, m.created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        let mut rooms = rooms;
        rooms.sort_by(|a, b| b.last_at.cmp(&a.last_at));
        Ok(rooms)
    }

    /// Full thread with one peer, oldest first. A course filter narrows the
    /// thread to that course's scope.
    pub async fn conversation(
        db: &PgPool,
        user_id: Uuid,
        peer_id: Uuid,
        course_id: Option<Uuid>,
    ) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"SELECT id, sender_id, receiver_id, course_id, content, created_at
               FROM messages
               WHERE ((sender_id = $1 AND receiver_id = $2)
                   OR (sender_id = $2 AND receiver_id = $1))
                 AND ($3::uuid IS NULL OR course_id = $3)
               ORDER BY created_at ASC"#,
        )
        .bind(user_id)
        .bind(peer_id)
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(messages)
    }

    /// Students message their course's instructor; instructors message a
    /// named receiver, restricted to enrolled students when course-scoped.
    #[instrument(skip(db, dto))]
    pub async fn send(
        db: &PgPool,
        sender_id: Uuid,
        sender_role: UserRole,
        dto: SendMessageDto,
    ) -> Result<Message, AppError> {
        let receiver_id = match sender_role {
            UserRole::Student => {
                let course_id = dto.course_id.ok_or_else(|| {
                    AppError::bad_request(anyhow::anyhow!(
                        "course_id is required when messaging an instructor"
                    ))
                })?;

                let instructor_id = sqlx::query_scalar::<_, Uuid>(
                    "SELECT instructor_id FROM courses WHERE id = $1",
                )
                .bind(course_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

                let enrolled = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM enrollments WHERE course_id = $1 AND user_id = $2)",
                )
                .bind(course_id)
                .bind(sender_id)
                .fetch_one(db)
                .await?;

                if !enrolled {
                    return Err(AppError::forbidden(anyhow::anyhow!(
                        "You are not enrolled in this course"
                    )));
                }

                instructor_id
            }
            _ => {
                let receiver_id = dto.receiver_id.ok_or_else(|| {
                    AppError::bad_request(anyhow::anyhow!("receiver_id is required"))
                })?;

                if let Some(course_id) = dto.course_id {
                    let owns = sqlx::query_scalar::<_, bool>(
                        "SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1 AND instructor_id = $2)",
                    )
                    .bind(course_id)
                    .bind(sender_id)
                    .fetch_one(db)
                    .await?;

                    if !owns && sender_role != UserRole::Admin {
                        return Err(AppError::forbidden(anyhow::anyhow!(
                            "You do not teach this course"
                        )));
                    }

                    let enrolled = sqlx::query_scalar::<_, bool>(
                        "SELECT EXISTS(SELECT 1 FROM enrollments WHERE course_id = $1 AND user_id = $2)",
                    )
                    .bind(course_id)
                    .bind(receiver_id)
                    .fetch_one(db)
                    .await?;

                    if !enrolled {
                        return Err(AppError::forbidden(anyhow::anyhow!(
                            "Receiver is not enrolled in this course"
                        )));
                    }
                }

                receiver_id
            }
        };

        let mut tx = db.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            r#"INSERT INTO messages (sender_id, receiver_id, course_id, content)
               VALUES ($1, $2, $3, $4)
               RETURNING id, sender_id, receiver_id, course_id, content, created_at"#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(dto.course_id)
        .bind(&dto.content)
        .fetch_one(&mut *tx)
        .await?;

        NotificationService::notify_user(
            &mut *tx,
            receiver_id,
            dto.course_id,
            kinds::MESSAGE,
            "New message",
            &dto.content,
        )
        .await?;

        tx.commit().await?;

        Ok(message)
    }
}
