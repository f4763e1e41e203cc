use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::attendance::model::status;
use crate::modules::dashboard::model::{
    InstructorDashboard, InstructorOpenSession, StudentDashboard, StudentOpenSession,
};
use crate::utils::errors::AppError;

pub struct DashboardService;

impl DashboardService {
    /// Open sessions across the instructor's courses with live counts.
    pub async fn instructor(
        db: &PgPool,
        instructor_id: Uuid,
    ) -> Result<InstructorDashboard, AppError> {
        let open_sessions = sqlx::query_as::<_, InstructorOpenSession>(
            r#"SELECT s.id AS session_id, s.course_id, c.title AS course_title,
                      s.week_number, s.session_date, s.attendance_method,
                      (SELECT COUNT(*) FROM enrollments e
                       JOIN users u ON u.id = e.user_id AND u.role = 'STUDENT'
                       WHERE e.course_id = s.course_id) AS total_students,
                      COUNT(a.student_id) FILTER (WHERE a.status <> $2) AS checked,
                      COUNT(a.student_id) FILTER (WHERE a.status = $3) AS present,
                      COUNT(a.student_id) FILTER (WHERE a.status = $4) AS late,
                      COUNT(a.student_id) FILTER (WHERE a.status = $5) AS absent,
                      COUNT(a.student_id) FILTER (WHERE a.status = $6) AS excused,
                      COUNT(a.student_id) FILTER (WHERE a.status = $2) AS pending
               FROM class_sessions s
               JOIN courses c ON c.id = s.course_id
               LEFT JOIN attendances a ON a.session_id = s.id
               WHERE c.instructor_id = $1 AND s.is_open = TRUE
               GROUP BY s.id, c.title
               ORDER BY s.session_date, s.start_time"#,
        )
        .bind(instructor_id)
        .bind(status::PENDING)
        .bind(status::PRESENT)
        .bind(status::LATE)
        .bind(status::ABSENT)
        .bind(status::EXCUSED)
        .fetch_all(db)
        .await?;

        Ok(InstructorDashboard { open_sessions })
    }

    /// Open sessions for the student's courses with their own mark.
    pub async fn student(db: &PgPool, student_id: Uuid) -> Result<StudentDashboard, AppError> {
        let open_sessions = sqlx::query_as::<_, StudentOpenSession>(
            r#"SELECT s.id AS session_id, s.course_id, c.title AS course_title,
                      s.week_number, s.session_date, s.attendance_method,
                      a.status AS my_status
               FROM class_sessions s
               JOIN courses c ON c.id = s.course_id
               JOIN enrollments e ON e.course_id = s.course_id AND e.user_id = $1
               LEFT JOIN attendances a ON a.session_id = s.id AND a.student_id = $1
               WHERE s.is_open = TRUE
               ORDER BY s.session_date, s.start_time"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        let checked = open_sessions
            .iter()
            .filter(|s| s.my_status.is_some_and(|st| st != status::PENDING))
            .count() as i64;
        let pending = open_sessions.len() as i64 - checked;

        Ok(StudentDashboard {
            open_sessions,
            checked,
            pending,
        })
    }
}
