use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::attendance::model::AttendanceSummary;
use crate::modules::attendance::service::AttendanceService;
use crate::modules::audit::service::AuditService;
use crate::modules::courses::model::{
    Course, CourseWithNames, CreateCourseDto, EnrollmentInfo, InstructorCourse, PolicyResponse,
    ScheduleDto, ScheduleEntry, ScoreResponse, StudentCourse, UpdateCourseDto, UpsertPolicyDto,
};
use crate::modules::sessions::service::SessionService;
use crate::utils::errors::AppError;

/// Built-in policy used until an instructor stores one.
const DEFAULT_ATTENDANCE_WEIGHT: i32 = 20;
const DEFAULT_LATENESS_PENALTY: i32 = 50;
const DEFAULT_ABSENCE_PENALTY: i32 = 100;

pub struct CourseService;

impl CourseService {
    /// 404 when the course is missing, 403 when the caller does not teach it.
    pub async fn ensure_instructor(
        db: &PgPool,
        course_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let instructor_id =
            sqlx::query_scalar::<_, Uuid>("SELECT instructor_id FROM courses WHERE id = $1")
                .bind(course_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        if instructor_id != user_id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You are not the instructor of this course"
            )));
        }

        Ok(())
    }

    /// Admins pass; instructors must own the course.
    pub async fn ensure_staff_access(
        db: &PgPool,
        course_id: Uuid,
        auth_user: &AuthUser,
    ) -> Result<(), AppError> {
        if auth_user.is_admin() {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)",
            )
            .bind(course_id)
            .fetch_one(db)
            .await?;

            if !exists {
                return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
            }
            return Ok(());
        }

        Self::ensure_instructor(db, course_id, auth_user.user_id()?).await
    }

    /// Attendance rate and weighted score from status counts and a policy.
    /// A course with no sessions yet scores zero across the board.
    pub(crate) fn compute_score(
        summary: &AttendanceSummary,
        attendance_weight: i32,
        lateness_penalty: i32,
        absence_penalty: i32,
    ) -> (f64, f64) {
        if summary.total == 0 {
            return (0.0, 0.0);
        }

        let rate = (summary.present + summary.excused) as f64 / summary.total as f64;
        let raw = 100.0
            - summary.late as f64 * lateness_penalty as f64
            - summary.absent as f64 * absence_penalty as f64;
        let score = raw.max(0.0) * attendance_weight as f64 / 100.0;

        (rate, score)
    }

    pub async fn list(db: &PgPool) -> Result<Vec<CourseWithNames>, AppError> {
        let courses = sqlx::query_as::<_, CourseWithNames>(
            r#"SELECT c.id, c.title, c.section, c.instructor_id, u.name AS instructor_name,
                      c.department_id, d.name AS department_name, c.semester_id,
                      sem.year, sem.term, c.created_at
               FROM courses c
               JOIN users u ON u.id = c.instructor_id
               JOIN departments d ON d.id = c.department_id
               JOIN semesters sem ON sem.id = c.semester_id
               ORDER BY sem.year DESC, sem.term DESC, c.title"#,
        )
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<CourseWithNames, AppError> {
        sqlx::query_as::<_, CourseWithNames>(
            r#"SELECT c.id, c.title, c.section, c.instructor_id, u.name AS instructor_name,
                      c.department_id, d.name AS department_name, c.semester_id,
                      sem.year, sem.term, c.created_at
               FROM courses c
               JOIN users u ON u.id = c.instructor_id
               JOIN departments d ON d.id = c.department_id
               JOIN semesters sem ON sem.id = c.semester_id
               WHERE c.id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    pub async fn schedules(db: &PgPool, course_id: Uuid) -> Result<Vec<ScheduleEntry>, AppError> {
        let schedules = sqlx::query_as::<_, ScheduleEntry>(
            r#"SELECT id, course_id, day_of_week, start_time, end_time
               FROM course_schedules
               WHERE course_id = $1
               ORDER BY day_of_week, start_time"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(schedules)
    }

    pub async fn enrollments(
        db: &PgPool,
        course_id: Uuid,
    ) -> Result<Vec<EnrollmentInfo>, AppError> {
        let enrollments = sqlx::query_as::<_, EnrollmentInfo>(
            r#"SELECT u.id AS user_id, u.email, u.name, u.role
               FROM enrollments e
               JOIN users u ON u.id = e.user_id
               WHERE e.course_id = $1
               ORDER BY u.name NULLS LAST, u.email"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(enrollments)
    }

    async fn insert_schedules(
        conn: &mut PgConnection,
        course_id: Uuid,
        schedules: &[ScheduleDto],
    ) -> Result<(), AppError> {
        for s in schedules {
            sqlx::query(
                r#"INSERT INTO course_schedules (course_id, day_of_week, start_time, end_time)
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(course_id)
            .bind(s.day_of_week)
            .bind(s.start_time)
            .bind(s.end_time)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    async fn insert_enrollments(
        conn: &mut PgConnection,
        course_id: Uuid,
        student_ids: &[Uuid],
    ) -> Result<(), AppError> {
        for student_id in student_ids {
            sqlx::query(
                r#"INSERT INTO enrollments (course_id, user_id, role)
                   VALUES ($1, $2, 'STUDENT')
                   ON CONFLICT (course_id, user_id) DO NOTHING"#,
            )
            .bind(course_id)
            .bind(student_id)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let mut tx = db.begin().await?;

        let course = sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (title, instructor_id, department_id, semester_id, section)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, title, instructor_id, department_id, semester_id, section,
                         created_at, updated_at"#,
        )
        .bind(&dto.title)
        .bind(dto.instructor_id)
        .bind(dto.department_id)
        .bind(dto.semester_id)
        .bind(&dto.section)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_schedules(&mut tx, course.id, &dto.schedules).await?;
        Self::insert_enrollments(&mut tx, course.id, &dto.student_ids).await?;

        tx.commit().await?;

        // Session generation runs after the course commits; a failure here
        // leaves a valid course the instructor can batch-generate for.
        match SessionService::generate_for_course(db, course.id).await {
            Ok(count) => {
                tracing::info!(course_id = %course.id, sessions = count, "Generated class sessions");
            }
            Err(err) => {
                tracing::warn!(course_id = %course.id, error = %err.error, "Session generation failed");
            }
        }

        AuditService::record(
            db,
            Some(actor_id),
            "COURSE_CREATED",
            "course",
            Some(course.id),
            &format!("Created course {}", course.title),
            ip,
        )
        .await;

        Ok(course)
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let mut tx = db.begin().await?;

        let course = sqlx::query_as::<_, Course>(
            r#"UPDATE courses
               SET title = $2, instructor_id = $3, department_id = $4, semester_id = $5,
                   section = $6, updated_at = now()
               WHERE id = $1
               RETURNING id, title, instructor_id, department_id, semester_id, section,
                         created_at, updated_at"#,
        )
        .bind(id)
        .bind(&dto.title)
        .bind(dto.instructor_id)
        .bind(dto.department_id)
        .bind(dto.semester_id)
        .bind(&dto.section)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        sqlx::query("DELETE FROM course_schedules WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_schedules(&mut tx, id, &dto.schedules).await?;

        sqlx::query("DELETE FROM enrollments WHERE course_id = $1 AND role = 'STUDENT'")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_enrollments(&mut tx, id, &dto.student_ids).await?;

        tx.commit().await?;

        AuditService::record(
            db,
            Some(actor_id),
            "COURSE_UPDATED",
            "course",
            Some(course.id),
            &format!("Updated course {}", course.title),
            ip,
        )
        .await;

        Ok(course)
    }

    /// Hard delete of a course and everything hanging off it, child tables
    /// first to satisfy the foreign keys.
    #[instrument(skip(db))]
    pub async fn delete(
        db: &PgPool,
        actor_id: Uuid,
        ip: Option<&str>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await?;
        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        let mut tx = db.begin().await?;

        sqlx::query(
            "DELETE FROM attendances WHERE session_id IN (SELECT id FROM class_sessions WHERE course_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM excuse_requests WHERE session_id IN (SELECT id FROM class_sessions WHERE course_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM appeals WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "DELETE FROM vote_responses WHERE vote_id IN (SELECT id FROM votes WHERE course_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM votes WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM notifications WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM messages WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM makeup_days WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM course_schedules WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM class_sessions WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM course_policies WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        AuditService::record(
            db,
            Some(actor_id),
            "COURSE_DELETED",
            "course",
            Some(id),
            "Deleted course with all sessions, attendance and related records",
            ip,
        )
        .await;

        Ok(())
    }

    pub async fn get_policy(
        db: &PgPool,
        auth_user: &AuthUser,
        course_id: Uuid,
    ) -> Result<PolicyResponse, AppError> {
        Self::ensure_staff_access(db, course_id, auth_user).await?;

        let stored = sqlx::query_as::<_, (i32, i32, i32, Option<String>)>(
            r#"SELECT attendance_weight, lateness_penalty, absence_penalty, description
               FROM course_policies WHERE course_id = $1"#,
        )
        .bind(course_id)
        .fetch_optional(db)
        .await?;

        Ok(match stored {
            Some((attendance_weight, lateness_penalty, absence_penalty, description)) => {
                PolicyResponse {
                    course_id,
                    attendance_weight,
                    lateness_penalty,
                    absence_penalty,
                    description,
                    is_default: false,
                }
            }
            None => PolicyResponse {
                course_id,
                attendance_weight: DEFAULT_ATTENDANCE_WEIGHT,
                lateness_penalty: DEFAULT_LATENESS_PENALTY,
                absence_penalty: DEFAULT_ABSENCE_PENALTY,
                description: None,
                is_default: true,
            },
        })
    }

    #[instrument(skip(db, auth_user, dto))]
    pub async fn upsert_policy(
        db: &PgPool,
        auth_user: &AuthUser,
        ip: Option<&str>,
        course_id: Uuid,
        dto: UpsertPolicyDto,
    ) -> Result<PolicyResponse, AppError> {
        Self::ensure_staff_access(db, course_id, auth_user).await?;

        let (attendance_weight, lateness_penalty, absence_penalty, description) =
            sqlx::query_as::<_, (i32, i32, i32, Option<String>)>(
                r#"INSERT INTO course_policies
                       (course_id, attendance_weight, lateness_penalty, absence_penalty, description)
                   VALUES ($1, $2, $3, $4, $5)
                   ON CONFLICT (course_id)
                   DO UPDATE SET attendance_weight = EXCLUDED.attendance_weight,
                                 lateness_penalty = EXCLUDED.lateness_penalty,
                                 absence_penalty = EXCLUDED.absence_penalty,
                                 description = EXCLUDED.description,
                                 updated_at = now()
                   RETURNING attendance_weight, lateness_penalty, absence_penalty, description"#,
            )
            .bind(course_id)
            .bind(dto.attendance_weight)
            .bind(dto.lateness_penalty)
            .bind(dto.absence_penalty)
            .bind(&dto.description)
            .fetch_one(db)
            .await?;

        AuditService::record(
            db,
            auth_user.user_id().ok(),
            "POLICY_UPDATED",
            "course",
            Some(course_id),
            &format!(
                "Set policy weight={} late={} absent={}",
                attendance_weight, lateness_penalty, absence_penalty
            ),
            ip,
        )
        .await;

        Ok(PolicyResponse {
            course_id,
            attendance_weight,
            lateness_penalty,
            absence_penalty,
            description,
            is_default: false,
        })
    }

    /// Attendance score for one student in one course. Students may only ask
    /// about themselves; staff name the student explicitly.
    #[instrument(skip(db, auth_user))]
    pub async fn score(
        db: &PgPool,
        auth_user: &AuthUser,
        course_id: Uuid,
        student_id: Option<Uuid>,
    ) -> Result<ScoreResponse, AppError> {
        let caller_id = auth_user.user_id()?;
        let target = if auth_user.is_student() {
            match student_id {
                Some(id) if id != caller_id => {
                    return Err(AppError::forbidden(anyhow::anyhow!(
                        "Students may only view their own score"
                    )));
                }
                _ => caller_id,
            }
        } else {
            student_id.ok_or_else(|| {
                AppError::bad_request(anyhow::anyhow!("student_id query parameter is required"))
            })?
        };

        let enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course_id)
        .bind(target)
        .fetch_one(db)
        .await?;
        if !enrolled {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Student is not enrolled in this course"
            )));
        }

        let statuses = sqlx::query_as::<_, (Option<i16>,)>(
            r#"SELECT a.status
               FROM class_sessions s
               LEFT JOIN attendances a ON a.session_id = s.id AND a.student_id = $2
               WHERE s.course_id = $1"#,
        )
        .bind(course_id)
        .bind(target)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|(s,)| s)
        .collect::<Vec<_>>();

        let summary = AttendanceService::summarize(&statuses);

        let policy = {
            // Bypass the staff gate: students read their own score with the
            // course policy applied, not the policy endpoint.
            let stored = sqlx::query_as::<_, (i32, i32, i32, Option<String>)>(
                r#"SELECT attendance_weight, lateness_penalty, absence_penalty, description
                   FROM course_policies WHERE course_id = $1"#,
            )
            .bind(course_id)
            .fetch_optional(db)
            .await?;

            match stored {
                Some((w, l, a, d)) => PolicyResponse {
                    course_id,
                    attendance_weight: w,
                    lateness_penalty: l,
                    absence_penalty: a,
                    description: d,
                    is_default: false,
                },
                None => PolicyResponse {
                    course_id,
                    attendance_weight: DEFAULT_ATTENDANCE_WEIGHT,
                    lateness_penalty: DEFAULT_LATENESS_PENALTY,
                    absence_penalty: DEFAULT_ABSENCE_PENALTY,
                    description: None,
                    is_default: true,
                },
            }
        };

        let (attendance_rate, score) = Self::compute_score(
            &summary,
            policy.attendance_weight,
            policy.lateness_penalty,
            policy.absence_penalty,
        );

        Ok(ScoreResponse {
            course_id,
            student_id: target,
            summary,
            attendance_rate,
            score,
            policy,
        })
    }

    pub async fn instructor_courses(
        db: &PgPool,
        instructor_id: Uuid,
    ) -> Result<Vec<InstructorCourse>, AppError> {
        let courses = sqlx::query_as::<_, InstructorCourse>(
            r#"SELECT c.id, c.title, c.section, c.semester_id, sem.year, sem.term,
                      sem.start_date, sem.end_date,
                      (SELECT COUNT(*) FROM enrollments e
                       JOIN users u ON u.id = e.user_id
                       WHERE e.course_id = c.id AND u.role = 'STUDENT') AS student_count
               FROM courses c
               JOIN semesters sem ON sem.id = c.semester_id
               WHERE c.instructor_id = $1
               ORDER BY sem.year DESC, sem.term DESC, c.title"#,
        )
        .bind(instructor_id)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    pub async fn student_courses(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<StudentCourse>, AppError> {
        let courses = sqlx::query_as::<_, StudentCourse>(
            r#"SELECT c.id, c.title, c.section, u.name AS instructor_name, sem.year, sem.term
               FROM enrollments e
               JOIN courses c ON c.id = e.course_id
               JOIN users u ON u.id = c.instructor_id
               JOIN semesters sem ON sem.id = c.semester_id
               WHERE e.user_id = $1
               ORDER BY sem.year DESC, sem.term DESC, c.title"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(present: i64, late: i64, absent: i64, excused: i64, pending: i64) -> AttendanceSummary {
        AttendanceSummary {
            total: present + late + absent + excused + pending,
            present,
            late,
            absent,
            excused,
            pending,
        }
    }

    #[test]
    fn perfect_attendance_earns_full_weight() {
        let (rate, score) = CourseService::compute_score(&summary(10, 0, 0, 0, 0), 20, 50, 100);
        assert_eq!(rate, 1.0);
        assert_eq!(score, 20.0);
    }

    #[test]
    fn excused_counts_toward_rate_without_penalty() {
        let (rate, score) = CourseService::compute_score(&summary(8, 0, 0, 2, 0), 20, 50, 100);
        assert_eq!(rate, 1.0);
        assert_eq!(score, 20.0);
    }

    #[test]
    fn late_and_absent_eat_into_the_score() {
        // 100 - 1*50 - 0 = 50 -> 50 * 20 / 100 = 10.
        let (rate, score) = CourseService::compute_score(&summary(9, 1, 0, 0, 0), 20, 50, 100);
        assert!((rate - 0.9).abs() < 1e-9);
        assert_eq!(score, 10.0);

        // One absence zeroes the raw score with the default penalty.
        let (_, score) = CourseService::compute_score(&summary(9, 0, 1, 0, 0), 20, 50, 100);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        let (_, score) = CourseService::compute_score(&summary(0, 3, 5, 0, 0), 20, 50, 100);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn no_sessions_means_zero_rate_and_score() {
        let (rate, score) = CourseService::compute_score(&AttendanceSummary::default(), 20, 50, 100);
        assert_eq!(rate, 0.0);
        assert_eq!(score, 0.0);
    }
}
