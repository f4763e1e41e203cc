use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::attendance::model::status;
use crate::modules::audit::model::AuditLog;
use crate::modules::courses::service::CourseService;
use crate::modules::reports::model::{
    AbsentRiskRow, AttendanceReport, ExcuseReport, LateRiskRow, RoleCounts, SystemReport,
    WeekAttendanceRow,
};
use crate::utils::errors::AppError;

const DEFAULT_RISK_LIMIT: i64 = 10;
const MAX_RISK_LIMIT: i64 = 100;
const LATE_STREAK_THRESHOLD: i32 = 2;

/// Longest run of consecutive late marks in a date-ordered status sequence.
pub(crate) fn max_late_streak(statuses: &[i16]) -> i32 {
    let mut best = 0;
    let mut run = 0;
    for &s in statuses {
        if s == status::LATE {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

pub struct ReportService;

impl ReportService {
    /// Per-week attendance totals for a course.
    pub async fn attendance(
        db: &PgPool,
        auth_user: &AuthUser,
        course_id: Uuid,
        week: Option<i32>,
    ) -> Result<AttendanceReport, AppError> {
        CourseService::ensure_staff_access(db, course_id, auth_user).await?;

        let enrolled = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM enrollments e
               JOIN users u ON u.id = e.user_id AND u.role = 'STUDENT'
               WHERE e.course_id = $1"#,
        )
        .bind(course_id)
        .fetch_one(db)
        .await?;

        let rows = sqlx::query_as::<_, (i32, i64, i64, i64, i64, i64, i64)>(
            r#"SELECT s.week_number,
                      COUNT(DISTINCT s.id) AS sessions,
                      COUNT(a.student_id) FILTER (WHERE a.status = $3) AS present,
                      COUNT(a.student_id) FILTER (WHERE a.status = $4) AS late,
                      COUNT(a.student_id) FILTER (WHERE a.status = $5) AS absent,
                      COUNT(a.student_id) FILTER (WHERE a.status = $6) AS excused,
                      COUNT(a.student_id) FILTER (WHERE a.status = $7) AS pending
               FROM class_sessions s
               LEFT JOIN attendances a ON a.session_id = s.id
               WHERE s.course_id = $1 AND ($2::int IS NULL OR s.week_number = $2)
               GROUP BY s.week_number
               ORDER BY s.week_number"#,
        )
        .bind(course_id)
        .bind(week)
        .bind(status::PRESENT)
        .bind(status::LATE)
        .bind(status::ABSENT)
        .bind(status::EXCUSED)
        .bind(status::PENDING)
        .fetch_all(db)
        .await?;

        let weeks = rows
            .into_iter()
            .map(
                |(week_number, sessions, present, late, absent, excused, pending)| {
                    let expected = sessions * enrolled;
                    let attendance_rate = if expected > 0 {
                        (present + excused) as f64 / expected as f64
                    } else {
                        0.0
                    };
                    WeekAttendanceRow {
                        week_number,
                        sessions,
                        present,
                        late,
                        absent,
                        excused,
                        pending,
                        attendance_rate,
                    }
                },
            )
            .collect();

        Ok(AttendanceReport {
            course_id,
            enrolled,
            weeks,
        })
    }

    /// Excuse totals and approval rate for a course.
    pub async fn excuses(
        db: &PgPool,
        auth_user: &AuthUser,
        course_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<ExcuseReport, AppError> {
        CourseService::ensure_staff_access(db, course_id, auth_user).await?;

        let (total, approved, rejected, pending) = sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"SELECT COUNT(*),
                      COUNT(*) FILTER (WHERE er.status = 'APPROVED'),
                      COUNT(*) FILTER (WHERE er.status = 'REJECTED'),
                      COUNT(*) FILTER (WHERE er.status = 'PENDING')
               FROM excuse_requests er
               JOIN class_sessions s ON s.id = er.session_id
               WHERE s.course_id = $1
                 AND ($2::date IS NULL OR s.session_date >= $2)
                 AND ($3::date IS NULL OR s.session_date <= $3)"#,
        )
        .bind(course_id)
        .bind(from)
        .bind(to)
        .fetch_one(db)
        .await?;

        let reviewed = approved + rejected;
        let approval_rate = if reviewed > 0 {
            approved as f64 / reviewed as f64
        } else {
            0.0
        };

        Ok(ExcuseReport {
            course_id,
            total,
            approved,
            rejected,
            pending,
            approval_rate,
        })
    }

    /// Students with the most absences, highest first.
    pub async fn absent_risk(
        db: &PgPool,
        auth_user: &AuthUser,
        course_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<AbsentRiskRow>, AppError> {
        CourseService::ensure_staff_access(db, course_id, auth_user).await?;

        let limit = limit.unwrap_or(DEFAULT_RISK_LIMIT).clamp(1, MAX_RISK_LIMIT);

        let rows = sqlx::query_as::<_, AbsentRiskRow>(
            r#"SELECT a.student_id, u.name AS student_name, COUNT(*) AS absences
               FROM attendances a
               JOIN class_sessions s ON s.id = a.session_id
               JOIN users u ON u.id = a.student_id
               WHERE s.course_id = $1 AND a.status = $2
               GROUP BY a.student_id, u.name
               ORDER BY absences DESC, u.name
               LIMIT $3"#,
        )
        .bind(course_id)
        .bind(status::ABSENT)
        .bind(limit)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    /// Students whose longest run of consecutive late marks reaches the
    /// threshold. The streak is computed per student over date-ordered rows.
    pub async fn late_risk(
        db: &PgPool,
        auth_user: &AuthUser,
        course_id: Uuid,
        from: Option<NaiveDate>,
    ) -> Result<Vec<LateRiskRow>, AppError> {
        CourseService::ensure_staff_access(db, course_id, auth_user).await?;

        let rows = sqlx::query_as::<_, (Uuid, Option<String>, i16)>(
            r#"SELECT a.student_id, u.name, a.status
               FROM attendances a
               JOIN class_sessions s ON s.id = a.session_id
               JOIN users u ON u.id = a.student_id
               WHERE s.course_id = $1
                 AND ($2::date IS NULL OR s.session_date >= $2)
               ORDER BY a.student_id, s.session_date, s.start_time"#,
        )
        .bind(course_id)
        .bind(from)
        .fetch_all(db)
        .await?;

        let mut result: Vec<LateRiskRow> = Vec::new();
        let mut current: Option<(Uuid, Option<String>, Vec<i16>)> = None;

        for (student_id, name, st) in rows {
            match &mut current {
                Some((id, _, statuses)) if *id == student_id => statuses.push(st),
                _ => {
                    if let Some((id, name, statuses)) = current.take() {
                        let streak = max_late_streak(&statuses);
                        if streak >= LATE_STREAK_THRESHOLD {
                            result.push(LateRiskRow {
                                student_id: id,
                                student_name: name,
                                late_streak: streak,
                            });
                        }
                    }
                    current = Some((student_id, name, vec![st]));
                }
            }
        }
        if let Some((id, name, statuses)) = current {
            let streak = max_late_streak(&statuses);
            if streak >= LATE_STREAK_THRESHOLD {
                result.push(LateRiskRow {
                    student_id: id,
                    student_name: name,
                    late_streak: streak,
                });
            }
        }

        result.sort_by(|a, b| b.late_streak.cmp(&a.late_streak));
        Ok(result)
    }

    /// Whole-system aggregates for the admin overview.
    pub async fn system(db: &PgPool) -> Result<SystemReport, AppError> {
        let (admins, instructors, students) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"SELECT COUNT(*) FILTER (WHERE role = 'ADMIN'),
                      COUNT(*) FILTER (WHERE role = 'INSTRUCTOR'),
                      COUNT(*) FILTER (WHERE role = 'STUDENT')
               FROM users"#,
        )
        .fetch_one(db)
        .await?;

        let courses = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await?;
        let sessions = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM class_sessions")
            .fetch_one(db)
            .await?;
        let attendance_records = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendances")
            .fetch_one(db)
            .await?;

        let recent_errors = sqlx::query_as::<_, AuditLog>(
            r#"SELECT id, user_id, action, target_type, target_id, description,
                      ip_address, created_at
               FROM audit_logs
               WHERE action LIKE '%ERROR%'
               ORDER BY created_at DESC
               LIMIT 20"#,
        )
        .fetch_all(db)
        .await?;

        Ok(SystemReport {
            users: RoleCounts {
                admins,
                instructors,
                students,
            },
            courses,
            sessions,
            attendance_records,
            recent_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::attendance::model::status::{ABSENT, LATE, PRESENT};

    #[test]
    fn streak_counts_consecutive_lates_only() {
        assert_eq!(max_late_streak(&[PRESENT, LATE, LATE, PRESENT, LATE]), 2);
    }

    #[test]
    fn streak_is_broken_by_any_other_status() {
        assert_eq!(max_late_streak(&[LATE, ABSENT, LATE, PRESENT, LATE]), 1);
    }

    #[test]
    fn streak_takes_the_longest_run() {
        assert_eq!(
            max_late_streak(&[LATE, LATE, PRESENT, LATE, LATE, LATE]),
            3
        );
    }

    #[test]
    fn streak_of_empty_history_is_zero() {
        assert_eq!(max_late_streak(&[]), 0);
    }
}
