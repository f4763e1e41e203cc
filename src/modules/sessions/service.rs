use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use rand::Rng;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::status;
use crate::modules::courses::service::CourseService;
use crate::modules::notifications::model::kinds;
use crate::modules::notifications::service::NotificationService;
use crate::modules::sessions::model::{
    AttendanceMethod, BatchSessionsDto, BatchSessionsResponse, ClassSession, CreateSessionDto,
    SessionWithCourse,
};
use crate::modules::sessions::planner::{ScheduleSlot, plan_semester_sessions, plan_weekly_dates};
use crate::utils::errors::AppError;

pub struct SessionService;

impl SessionService {
    /// 4-digit code students type in for AUTH_CODE sessions.
    pub fn generate_auth_code() -> String {
        format!("{:04}", rand::thread_rng().gen_range(0..10_000))
    }

    pub async fn list_for_course(
        db: &PgPool,
        course_id: Uuid,
    ) -> Result<Vec<ClassSession>, AppError> {
        let sessions = sqlx::query_as::<_, ClassSession>(
            r#"SELECT id, course_id, week_number, session_date, start_time, end_time,
                      attendance_method, auth_code, is_open, created_at
               FROM class_sessions
               WHERE course_id = $1
               ORDER BY week_number, session_date"#,
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(sessions)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<SessionWithCourse, AppError> {
        sqlx::query_as::<_, SessionWithCourse>(
            r#"SELECT s.id, s.course_id, c.title AS course_title, s.week_number,
                      s.session_date, s.start_time, s.end_time, s.attendance_method,
                      s.auth_code, s.is_open, s.created_at
               FROM class_sessions s
               JOIN courses c ON c.id = s.course_id
               WHERE s.id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Session not found")))
    }

    async fn insert_session(
        conn: &mut PgConnection,
        course_id: Uuid,
        week_number: i32,
        session_date: NaiveDate,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
        method: AttendanceMethod,
    ) -> Result<ClassSession, AppError> {
        let auth_code = match method {
            AttendanceMethod::AuthCode => Some(Self::generate_auth_code()),
            _ => None,
        };

        let session = sqlx::query_as::<_, ClassSession>(
            r#"INSERT INTO class_sessions
                   (course_id, week_number, session_date, start_time, end_time,
                    attendance_method, auth_code)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, course_id, week_number, session_date, start_time, end_time,
                         attendance_method, auth_code, is_open, created_at"#,
        )
        .bind(course_id)
        .bind(week_number)
        .bind(session_date)
        .bind(start_time)
        .bind(end_time)
        .bind(method)
        .bind(auth_code)
        .fetch_one(&mut *conn)
        .await?;

        Ok(session)
    }

    /// Mark every enrolled student present for a roll-call session.
    async fn seed_roll_call(
        conn: &mut PgConnection,
        session_id: Uuid,
        course_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO attendances (session_id, student_id, status)
               SELECT $1, e.user_id, $3
               FROM enrollments e
               JOIN users u ON u.id = e.user_id
               WHERE e.course_id = $2 AND u.role = 'STUDENT'
               ON CONFLICT (session_id, student_id)
               DO UPDATE SET status = EXCLUDED.status, checked_at = now()"#,
        )
        .bind(session_id)
        .bind(course_id)
        .bind(status::PRESENT)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    #[instrument(skip(db, dto))]
    pub async fn create(
        db: &PgPool,
        instructor_id: Uuid,
        course_id: Uuid,
        dto: CreateSessionDto,
    ) -> Result<ClassSession, AppError> {
        CourseService::ensure_instructor(db, course_id, instructor_id).await?;

        let mut tx = db.begin().await?;

        let session = Self::insert_session(
            &mut tx,
            course_id,
            dto.week_number,
            dto.session_date,
            dto.start_time,
            dto.end_time,
            dto.attendance_method,
        )
        .await?;

        if session.attendance_method == AttendanceMethod::RollCall {
            Self::seed_roll_call(&mut tx, session.id, course_id).await?;
        }

        tx.commit().await?;

        Ok(session)
    }

    /// Weekly batch generation over a date range for one weekday. Holiday
    /// dates drop out unless a makeup day covers them, without disturbing
    /// the week numbering.
    #[instrument(skip(db, dto), fields(course_id = %dto.course_id))]
    pub async fn batch(
        db: &PgPool,
        instructor_id: Uuid,
        dto: BatchSessionsDto,
    ) -> Result<BatchSessionsResponse, AppError> {
        CourseService::ensure_instructor(db, dto.course_id, instructor_id).await?;

        let weeks = plan_weekly_dates(dto.start_date, dto.end_date, dto.day_of_week);
        if weeks.is_empty() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "No matching weekday falls inside the given date range"
            )));
        }

        let holidays = Self::load_holidays(db).await?;
        let makeup_dates = Self::load_makeup_dates(db, dto.course_id).await?;
        let overrides: HashMap<i32, AttendanceMethod> = dto
            .method_overrides
            .iter()
            .map(|o| (o.week_number, o.attendance_method))
            .collect();

        let mut tx = db.begin().await?;
        let mut created = Vec::new();
        let mut skipped_holidays = Vec::new();

        for (week, date) in weeks {
            if holidays.contains(&date) && !makeup_dates.contains(&date) {
                skipped_holidays.push(date);
                continue;
            }

            let method = overrides
                .get(&week)
                .copied()
                .unwrap_or(AttendanceMethod::AuthCode);

            let session = Self::insert_session(
                &mut tx,
                dto.course_id,
                week,
                date,
                dto.start_time,
                dto.end_time,
                method,
            )
            .await?;
            created.push(session);
        }

        tx.commit().await?;

        Ok(BatchSessionsResponse {
            created,
            skipped_holidays,
        })
    }

    /// Generate the full semester of sessions for a freshly created course
    /// from its weekly schedule entries.
    #[instrument(skip(db))]
    pub async fn generate_for_course(db: &PgPool, course_id: Uuid) -> Result<u64, AppError> {
        let (start_date, end_date) = sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
            r#"SELECT sem.start_date, sem.end_date
               FROM courses c
               JOIN semesters sem ON sem.id = c.semester_id
               WHERE c.id = $1"#,
        )
        .bind(course_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))?;

        let schedules = sqlx::query_as::<_, (i16, NaiveTime, NaiveTime)>(
            "SELECT day_of_week, start_time, end_time FROM course_schedules WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|(day_of_week, start_time, end_time)| ScheduleSlot {
            day_of_week,
            start_time,
            end_time,
        })
        .collect::<Vec<_>>();

        let holidays = Self::load_holidays(db).await?;
        let makeup_dates = Self::load_makeup_dates(db, course_id).await?;

        let planned =
            plan_semester_sessions(start_date, end_date, &schedules, &holidays, &makeup_dates);

        let mut tx = db.begin().await?;
        let count = planned.len() as u64;
        for p in planned {
            Self::insert_session(
                &mut tx,
                course_id,
                p.week_number,
                p.session_date,
                Some(p.start_time),
                Some(p.end_time),
                AttendanceMethod::AuthCode,
            )
            .await?;
        }
        tx.commit().await?;

        Ok(count)
    }

    async fn load_holidays(db: &PgPool) -> Result<HashSet<NaiveDate>, AppError> {
        let dates =
            sqlx::query_scalar::<_, NaiveDate>("SELECT date FROM holidays WHERE is_holiday = TRUE")
                .fetch_all(db)
                .await?;
        Ok(dates.into_iter().collect())
    }

    async fn load_makeup_dates(
        db: &PgPool,
        course_id: Uuid,
    ) -> Result<HashSet<NaiveDate>, AppError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT makeup_date FROM makeup_days WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;
        Ok(dates.into_iter().collect())
    }

    async fn fetch_owned(
        db: &PgPool,
        session_id: Uuid,
        instructor_id: Uuid,
    ) -> Result<SessionWithCourse, AppError> {
        let session = Self::get(db, session_id).await?;
        CourseService::ensure_instructor(db, session.course_id, instructor_id).await?;
        Ok(session)
    }

    /// Open check-in. Roll-call sessions mark everyone present up front;
    /// enrolled students get an ATTENDANCE_OPENED notification either way.
    #[instrument(skip(db))]
    pub async fn open(
        db: &PgPool,
        instructor_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionWithCourse, AppError> {
        let session = Self::fetch_owned(db, session_id, instructor_id).await?;

        let mut tx = db.begin().await?;

        sqlx::query("UPDATE class_sessions SET is_open = TRUE WHERE id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        if session.attendance_method == AttendanceMethod::RollCall {
            Self::seed_roll_call(&mut tx, session_id, session.course_id).await?;
        }

        NotificationService::notify_course_students(
            &mut *tx,
            session.course_id,
            kinds::ATTENDANCE_OPENED,
            "Attendance check-in is open",
            &format!(
                "Week {} check-in has started for {}",
                session.week_number, session.course_title
            ),
        )
        .await?;

        tx.commit().await?;

        Self::get(db, session_id).await
    }

    /// Close check-in without telling anyone; used mid-class.
    #[instrument(skip(db))]
    pub async fn pause(
        db: &PgPool,
        instructor_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionWithCourse, AppError> {
        Self::fetch_owned(db, session_id, instructor_id).await?;

        sqlx::query("UPDATE class_sessions SET is_open = FALSE WHERE id = $1")
            .bind(session_id)
            .execute(db)
            .await?;

        Self::get(db, session_id).await
    }

    /// Close check-in for good and notify the class.
    #[instrument(skip(db))]
    pub async fn close(
        db: &PgPool,
        instructor_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionWithCourse, AppError> {
        let session = Self::fetch_owned(db, session_id, instructor_id).await?;

        let mut tx = db.begin().await?;

        sqlx::query("UPDATE class_sessions SET is_open = FALSE WHERE id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        NotificationService::notify_course_students(
            &mut *tx,
            session.course_id,
            kinds::ATTENDANCE_CLOSED,
            "Attendance check-in closed",
            &format!(
                "Week {} check-in has closed for {}",
                session.week_number, session.course_title
            ),
        )
        .await?;

        tx.commit().await?;

        Self::get(db, session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_codes_are_four_digits() {
        for _ in 0..100 {
            let code = SessionService::generate_auth_code();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
