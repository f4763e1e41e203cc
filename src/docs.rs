use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::appeals::model::{
    Appeal, AppealStatus, AppealWithContext, CreateAppealDto, RejectAppealDto,
};
use crate::modules::attendance::model::{
    AttendDto, Attendance, AttendanceSummary, CorrectionDto, MyAttendanceResponse, RosterRecord,
    RosterResponse, StudentSessionRecord,
};
use crate::modules::audit::model::{AuditLog, AuditLogListResponse};
use crate::modules::auth::model::{AuthResponse, LoginDto};
use crate::modules::calendar::model::{CreateMakeupDayDto, Holiday, MakeupDay, UpsertHolidayDto};
use crate::modules::courses::model::{
    Course, CourseWithNames, CreateCourseDto, EnrollmentInfo, InstructorCourse, PolicyResponse,
    ScheduleDto, ScheduleEntry, ScoreResponse, StudentCourse, UpdateCourseDto, UpsertPolicyDto,
};
use crate::modules::dashboard::model::{
    InstructorDashboard, InstructorOpenSession, StudentDashboard, StudentOpenSession,
};
use crate::modules::departments::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use crate::modules::excuses::model::{
    ExcuseRequest, ExcuseStatus, ExcuseTemplate, ExcuseWithContext, ReviewExcuseDto,
};
use crate::modules::files::model::UploadedFile;
use crate::modules::messages::model::{Message, MessageRoom, SendMessageDto};
use crate::modules::notifications::model::{Notification, ReadAllResponse, UnreadCountResponse};
use crate::modules::reports::model::{
    AbsentRiskRow, AttendanceReport, ExcuseReport, LateRiskRow, RoleCounts, SystemReport,
    WeekAttendanceRow,
};
use crate::modules::semesters::model::{CreateSemesterDto, Semester, UpdateSemesterDto};
use crate::modules::sessions::model::{
    AttendanceMethod, BatchSessionsDto, BatchSessionsResponse, ClassSession, CreateSessionDto,
    SessionWithCourse, WeekMethodOverride,
};
use crate::modules::users::model::{CreateUserDto, UpdateUserDto, User, UserRole};
use crate::modules::votes::model::{
    CreateVoteDto, RespondDto, StudentVote, Vote, VoteAnswer, VoteResponseRecord,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::logout,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::semesters::controller::get_semesters,
        crate::modules::semesters::controller::create_semester,
        crate::modules::semesters::controller::update_semester,
        crate::modules::semesters::controller::delete_semester,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::get_course_schedules,
        crate::modules::courses::controller::get_course_enrollments,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::get_course_policy,
        crate::modules::courses::controller::put_course_policy,
        crate::modules::courses::controller::get_course_score,
        crate::modules::courses::controller::get_instructor_courses,
        crate::modules::courses::controller::get_student_courses,
        crate::modules::sessions::controller::get_course_sessions,
        crate::modules::sessions::controller::get_session,
        crate::modules::sessions::controller::create_session,
        crate::modules::sessions::controller::batch_create_sessions,
        crate::modules::sessions::controller::open_session,
        crate::modules::sessions::controller::pause_session,
        crate::modules::sessions::controller::close_session,
        crate::modules::attendance::controller::attend_session,
        crate::modules::attendance::controller::get_my_attendance,
        crate::modules::attendance::controller::get_session_attendance,
        crate::modules::attendance::controller::correct_attendance,
        crate::modules::excuses::controller::create_excuse,
        crate::modules::excuses::controller::get_my_excuses,
        crate::modules::excuses::controller::get_excuses,
        crate::modules::excuses::controller::review_excuse,
        crate::modules::excuses::controller::get_excuse_templates,
        crate::modules::appeals::controller::create_appeal,
        crate::modules::appeals::controller::get_my_appeals,
        crate::modules::appeals::controller::get_appeals,
        crate::modules::appeals::controller::reject_appeal,
        crate::modules::votes::controller::create_vote,
        crate::modules::votes::controller::get_student_votes,
        crate::modules::votes::controller::respond_to_vote,
        crate::modules::notifications::controller::get_notifications,
        crate::modules::notifications::controller::get_unread_count,
        crate::modules::notifications::controller::mark_notification_read,
        crate::modules::notifications::controller::mark_all_notifications_read,
        crate::modules::messages::controller::get_message_rooms,
        crate::modules::messages::controller::get_conversation,
        crate::modules::messages::controller::send_message,
        crate::modules::calendar::controller::get_holidays,
        crate::modules::calendar::controller::upsert_holiday,
        crate::modules::calendar::controller::get_makeup_days,
        crate::modules::calendar::controller::create_makeup_day,
        crate::modules::calendar::controller::delete_makeup_day,
        crate::modules::audit::controller::get_audit_logs,
        crate::modules::dashboard::controller::get_instructor_dashboard,
        crate::modules::dashboard::controller::get_student_dashboard,
        crate::modules::reports::controller::get_attendance_report,
        crate::modules::reports::controller::get_excuse_report,
        crate::modules::reports::controller::get_absent_risk_report,
        crate::modules::reports::controller::get_late_risk_report,
        crate::modules::reports::controller::get_system_report,
        crate::modules::files::controller::upload_file,
    ),
    components(
        schemas(
            User,
            UserRole,
            CreateUserDto,
            UpdateUserDto,
            LoginDto,
            AuthResponse,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            Semester,
            CreateSemesterDto,
            UpdateSemesterDto,
            Course,
            CourseWithNames,
            ScheduleEntry,
            ScheduleDto,
            CreateCourseDto,
            UpdateCourseDto,
            EnrollmentInfo,
            PolicyResponse,
            UpsertPolicyDto,
            ScoreResponse,
            InstructorCourse,
            StudentCourse,
            AttendanceMethod,
            ClassSession,
            SessionWithCourse,
            CreateSessionDto,
            WeekMethodOverride,
            BatchSessionsDto,
            BatchSessionsResponse,
            Attendance,
            AttendDto,
            AttendanceSummary,
            StudentSessionRecord,
            MyAttendanceResponse,
            RosterRecord,
            RosterResponse,
            CorrectionDto,
            ExcuseStatus,
            ExcuseRequest,
            ExcuseWithContext,
            ReviewExcuseDto,
            ExcuseTemplate,
            AppealStatus,
            Appeal,
            AppealWithContext,
            CreateAppealDto,
            RejectAppealDto,
            VoteAnswer,
            Vote,
            CreateVoteDto,
            StudentVote,
            RespondDto,
            VoteResponseRecord,
            Notification,
            UnreadCountResponse,
            ReadAllResponse,
            Message,
            MessageRoom,
            SendMessageDto,
            Holiday,
            UpsertHolidayDto,
            MakeupDay,
            CreateMakeupDayDto,
            AuditLog,
            AuditLogListResponse,
            InstructorDashboard,
            InstructorOpenSession,
            StudentDashboard,
            StudentOpenSession,
            AttendanceReport,
            WeekAttendanceRow,
            ExcuseReport,
            AbsentRiskRow,
            LateRiskRow,
            RoleCounts,
            SystemReport,
            UploadedFile,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and token endpoints"),
        (name = "Users", description = "User administration"),
        (name = "Departments", description = "Department administration"),
        (name = "Semesters", description = "Semester administration"),
        (name = "Courses", description = "Courses, schedules, policies and scores"),
        (name = "Sessions", description = "Class session planning and control"),
        (name = "Attendance", description = "Check-in, rosters and corrections"),
        (name = "Excuses", description = "Absence excuse requests and review"),
        (name = "Appeals", description = "Attendance appeals"),
        (name = "Votes", description = "No-class and makeup votes"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "Messages", description = "Student-instructor messaging"),
        (name = "Calendar", description = "Holidays and makeup days"),
        (name = "Audit", description = "Audit log access"),
        (name = "Dashboard", description = "Live session dashboards"),
        (name = "Reports", description = "Attendance and risk reporting"),
        (name = "Files", description = "File uploads")
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "Classroom attendance management REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
