use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{
    AttendDto, Attendance, AttendanceSummary, CorrectionDto, MyAttendanceResponse, RosterRecord,
    RosterResponse, StudentSessionRecord, status,
};
use crate::modules::audit::service::AuditService;
use crate::modules::courses::service::CourseService;
use crate::modules::notifications::model::kinds;
use crate::modules::notifications::service::NotificationService;
use crate::modules::sessions::model::AttendanceMethod;
use crate::modules::sessions::service::SessionService;
use crate::utils::errors::AppError;

/// Electronic check-ins later than this many minutes after session start
/// count as late.
const LATE_GRACE_MINUTES: i64 = 15;

pub struct AttendanceService;

impl AttendanceService {
    /// Whether an electronic check-in at `now` counts as late.
    fn is_late(now: NaiveDateTime, session_start: Option<NaiveDateTime>) -> bool {
        match session_start {
            Some(start) => now > start + Duration::minutes(LATE_GRACE_MINUTES),
            // Sessions without a start time cannot be late.
            None => false,
        }
    }

    pub(crate) fn summarize(statuses: &[Option<i16>]) -> AttendanceSummary {
        let mut summary = AttendanceSummary {
            total: statuses.len() as i64,
            ..Default::default()
        };

        for s in statuses {
            match s {
                Some(v) if *v == status::PRESENT => summary.present += 1,
                Some(v) if *v == status::LATE => summary.late += 1,
                Some(v) if *v == status::ABSENT => summary.absent += 1,
                Some(v) if *v == status::EXCUSED => summary.excused += 1,
                _ => summary.pending += 1,
            }
        }

        summary
    }

    pub(crate) async fn ensure_enrolled(
        db: &PgPool,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), AppError> {
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

        Ok(())
    }

    async fn upsert(
        executor: impl sqlx::PgExecutor<'_>,
        session_id: Uuid,
        student_id: Uuid,
        new_status: i16,
    ) -> Result<Attendance, AppError> {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"INSERT INTO attendances (session_id, student_id, status)
               VALUES ($1, $2, $3)
               ON CONFLICT (session_id, student_id)
               DO UPDATE SET status = EXCLUDED.status, checked_at = now()
               RETURNING session_id, student_id, status, checked_at"#,
        )
        .bind(session_id)
        .bind(student_id)
        .bind(new_status)
        .fetch_one(executor)
        .await?;

        Ok(attendance)
    }

    /// Student self check-in.
    #[instrument(skip(db, dto))]
    pub async fn attend(
        db: &PgPool,
        student_id: Uuid,
        session_id: Uuid,
        dto: AttendDto,
    ) -> Result<Attendance, AppError> {
        let session = SessionService::get(db, session_id).await?;
        Self::ensure_enrolled(db, session.course_id, student_id).await?;

        if !session.is_open {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Attendance is not open for this session"
            )));
        }

        let new_status = match session.attendance_method {
            AttendanceMethod::AuthCode => {
                let supplied = dto.auth_code.as_deref().unwrap_or_default();
                if session.auth_code.as_deref() != Some(supplied) || supplied.is_empty() {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Incorrect attendance code"
                    )));
                }
                status::PRESENT
            }
            AttendanceMethod::Electronic => {
                let start = session
                    .start_time
                    .map(|t| session.session_date.and_time(t));
                if Self::is_late(Utc::now().naive_utc(), start) {
                    status::LATE
                } else {
                    status::PRESENT
                }
            }
            AttendanceMethod::RollCall => status::PRESENT,
        };

        Self::upsert(db, session_id, student_id, new_status).await
    }

    /// A student's own record for every session of a course.
    #[instrument(skip(db))]
    pub async fn my_attendance(
        db: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<MyAttendanceResponse, AppError> {
        Self::ensure_enrolled(db, course_id, student_id).await?;

        let records = sqlx::query_as::<_, StudentSessionRecord>(
            r#"SELECT s.id AS session_id, s.week_number, s.session_date, s.start_time,
                      s.attendance_method, s.is_open, a.status, a.checked_at
               FROM class_sessions s
               LEFT JOIN attendances a ON a.session_id = s.id AND a.student_id = $2
               WHERE s.course_id = $1
               ORDER BY s.week_number, s.session_date"#,
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_all(db)
        .await?;

        let statuses: Vec<Option<i16>> = records.iter().map(|r| r.status).collect();
        let summary = Self::summarize(&statuses);

        Ok(MyAttendanceResponse { records, summary })
    }

    /// Full roster for one session, instructor view.
    #[instrument(skip(db))]
    pub async fn roster(
        db: &PgPool,
        instructor_id: Uuid,
        session_id: Uuid,
    ) -> Result<RosterResponse, AppError> {
        let session = SessionService::get(db, session_id).await?;
        CourseService::ensure_instructor(db, session.course_id, instructor_id).await?;

        let records = sqlx::query_as::<_, RosterRecord>(
            r#"SELECT u.id AS student_id, u.email, u.name, a.status, a.checked_at
               FROM enrollments e
               JOIN users u ON u.id = e.user_id AND u.role = 'STUDENT'
               LEFT JOIN attendances a ON a.session_id = $2 AND a.student_id = u.id
               WHERE e.course_id = $1
               ORDER BY u.name NULLS LAST, u.email"#,
        )
        .bind(session.course_id)
        .bind(session_id)
        .fetch_all(db)
        .await?;

        let statuses: Vec<Option<i16>> = records.iter().map(|r| r.status).collect();
        let stats = Self::summarize(&statuses);

        Ok(RosterResponse { records, stats })
    }

    /// Instructor correction of a single attendance cell, optionally
    /// resolving a linked appeal in the same transaction.
    #[instrument(skip(db, dto))]
    pub async fn correct(
        db: &PgPool,
        instructor_id: Uuid,
        ip: Option<&str>,
        session_id: Uuid,
        student_id: Uuid,
        dto: CorrectionDto,
    ) -> Result<Attendance, AppError> {
        if !status::is_valid(dto.status) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Status must be between 0 and 4"
            )));
        }

        let session = SessionService::get(db, session_id).await?;
        CourseService::ensure_instructor(db, session.course_id, instructor_id).await?;

        let old_status = sqlx::query_scalar::<_, i16>(
            "SELECT status FROM attendances WHERE session_id = $1 AND student_id = $2",
        )
        .bind(session_id)
        .bind(student_id)
        .fetch_optional(db)
        .await?;

        let mut tx = db.begin().await?;

        let attendance = Self::upsert(&mut *tx, session_id, student_id, dto.status).await?;

        if let Some(appeal_id) = dto.appeal_id {
            let resolved = sqlx::query_scalar::<_, Uuid>(
                r#"UPDATE appeals
                   SET status = 'RESOLVED', instructor_comment = $4, resolved_at = now()
                   WHERE id = $1 AND session_id = $2 AND student_id = $3
                   RETURNING id"#,
            )
            .bind(appeal_id)
            .bind(session_id)
            .bind(student_id)
            .bind(&dto.comment)
            .fetch_optional(&mut *tx)
            .await?;

            if resolved.is_none() {
                return Err(AppError::not_found(anyhow::anyhow!(
                    "Appeal not found for this session and student"
                )));
            }

            let note = dto
                .comment
                .clone()
                .unwrap_or_else(|| "Your appeal has been resolved".to_string());

            sqlx::query(
                r#"INSERT INTO messages (sender_id, receiver_id, course_id, content)
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(instructor_id)
            .bind(student_id)
            .bind(session.course_id)
            .bind(&note)
            .execute(&mut *tx)
            .await?;

            NotificationService::notify_user(
                &mut *tx,
                student_id,
                Some(session.course_id),
                kinds::APPEAL_RESULT,
                "Appeal resolved",
                &format!(
                    "Your week {} attendance for {} was updated to {}",
                    session.week_number,
                    session.course_title,
                    status::label(dto.status)
                ),
            )
            .await?;
        }

        tx.commit().await?;

        if dto.status == status::ABSENT {
            Self::warn_on_repeat_absence(db, session.course_id, student_id).await?;
        }

        let old_label = old_status.map(status::label).unwrap_or("UNRECORDED");
        AuditService::record(
            db,
            Some(instructor_id),
            "ATTENDANCE_CORRECTED",
            "attendance",
            Some(session_id),
            &format!(
                "Corrected week {} attendance for student {}: {} -> {}",
                session.week_number,
                student_id,
                old_label,
                status::label(dto.status)
            ),
            ip,
        )
        .await;

        Ok(attendance)
    }

    /// Nudge the student exactly when an absence becomes their 2nd
    /// (warning) or 3rd (critical) in the course.
    pub async fn warn_on_repeat_absence(
        db: &PgPool,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), AppError> {
        let absences = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*)
               FROM attendances a
               JOIN class_sessions s ON s.id = a.session_id
               WHERE s.course_id = $1 AND a.student_id = $2 AND a.status = $3"#,
        )
        .bind(course_id)
        .bind(student_id)
        .bind(status::ABSENT)
        .fetch_one(db)
        .await?;

        let (title, content) = match absences {
            2 => (
                "Absence warning",
                "You have been absent twice in this course. Further absences will hurt your attendance score.",
            ),
            3 => (
                "Critical absence warning",
                "You have been absent three times in this course. Please contact your instructor.",
            ),
            _ => return Ok(()),
        };

        NotificationService::notify_user(
            db,
            student_id,
            Some(course_id),
            kinds::ABSENCE_WARNING,
            title,
            content,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn late_only_after_grace_period() {
        let start = Some(at(9, 0));
        assert!(!AttendanceService::is_late(at(9, 0), start));
        assert!(!AttendanceService::is_late(at(9, 15), start));
        assert!(AttendanceService::is_late(at(9, 16), start));
        assert!(!AttendanceService::is_late(at(8, 30), start));
    }

    #[test]
    fn missing_start_time_is_never_late() {
        assert!(!AttendanceService::is_late(at(23, 59), None));
    }

    #[test]
    fn summary_counts_each_status() {
        let statuses = vec![
            Some(status::PRESENT),
            Some(status::PRESENT),
            Some(status::LATE),
            Some(status::ABSENT),
            Some(status::EXCUSED),
            Some(status::PENDING),
            None,
        ];
        let summary = AttendanceService::summarize(&statuses);
        assert_eq!(
            summary,
            AttendanceSummary {
                total: 7,
                present: 2,
                late: 1,
                absent: 1,
                excused: 1,
                pending: 2,
            }
        );
    }

    #[test]
    fn empty_summary_is_all_zero() {
        assert_eq!(AttendanceService::summarize(&[]), AttendanceSummary::default());
    }
}
