#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::{
        common::EmployeeParam,
        health::HealthResponse,
        info::ApiInfo,
        reports::{
            AttendanceReportRow, DepartmentHeadcount, LeaveReport, PayrollReport, PeriodQuery,
            ReportRangeQuery, SummaryReport,
        },
    },
    models::{
        attendance::{AttendanceQuery, AttendanceRecord, AttendanceStatus, CheckInOutRequest},
        department::{CreateDepartment, Department, DepartmentResponse, UpdateDepartment},
        employee::{CreateEmployee, Employee, EmployeeQuery, EmployeeStatus, UpdateEmployee},
        exit_interview::{
            CreateExitInterview, ExitInterview, ExitInterviewQuery, ExitInterviewStatus,
            UpdateExitInterview,
        },
        leave::{
            CreateLeaveRequest, LeaveQuery, LeaveRequest, LeaveStatus, LeaveType,
            ReviewLeaveRequest,
        },
        notification::{
            CreateNotificationRequest, Notification, NotificationCount, NotificationKind,
            NotificationQuery,
        },
        payroll::{GeneratePayrollRequest, PayrollQuery, PayrollRecord, PayrollStatus},
        user::{
            AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateUser,
            UserResponse, UserRole,
        },
        PaginatedResponse, PaginationQuery,
    },
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "HR Management API"),
    paths(
        health_doc,
        info_doc,
        register_doc,
        login_doc,
        me_doc,
        change_password_doc,
        list_users_doc,
        get_user_doc,
        update_user_doc,
        delete_user_doc,
        list_departments_doc,
        get_department_doc,
        create_department_doc,
        update_department_doc,
        delete_department_doc,
        list_employees_doc,
        my_employee_doc,
        get_employee_doc,
        create_employee_doc,
        update_employee_doc,
        delete_employee_doc,
        check_in_doc,
        check_out_doc,
        list_attendance_doc,
        today_attendance_doc,
        create_leave_doc,
        list_leaves_doc,
        get_leave_doc,
        approve_leave_doc,
        reject_leave_doc,
        cancel_leave_doc,
        generate_payroll_doc,
        list_payroll_doc,
        get_payroll_doc,
        pay_payroll_doc,
        delete_payroll_doc,
        list_notifications_doc,
        unread_count_doc,
        create_notification_doc,
        mark_read_doc,
        mark_all_read_doc,
        delete_notification_doc,
        list_exit_interviews_doc,
        get_exit_interview_doc,
        create_exit_interview_doc,
        update_exit_interview_doc,
        delete_exit_interview_doc,
        summary_report_doc,
        department_report_doc,
        attendance_report_doc,
        attendance_export_doc,
        payroll_report_doc,
        leave_report_doc
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            ApiInfo,
            PaginationQuery,
            // auth & users
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            ChangePasswordRequest,
            UpdateUser,
            UserResponse,
            UserRole,
            // organization
            Department,
            DepartmentResponse,
            CreateDepartment,
            UpdateDepartment,
            Employee,
            EmployeeStatus,
            CreateEmployee,
            UpdateEmployee,
            // time & leave
            AttendanceRecord,
            AttendanceStatus,
            CheckInOutRequest,
            LeaveRequest,
            LeaveStatus,
            LeaveType,
            CreateLeaveRequest,
            ReviewLeaveRequest,
            // payroll
            PayrollRecord,
            PayrollStatus,
            GeneratePayrollRequest,
            // notifications
            Notification,
            NotificationKind,
            NotificationCount,
            CreateNotificationRequest,
            // exit interviews
            ExitInterview,
            ExitInterviewStatus,
            CreateExitInterview,
            UpdateExitInterview,
            // reports
            SummaryReport,
            DepartmentHeadcount,
            AttendanceReportRow,
            PayrollReport,
            LeaveReport
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "System", description = "Health and API metadata"),
        (name = "Auth", description = "Registration, login and password management"),
        (name = "Users", description = "Account administration"),
        (name = "Departments", description = "Organizational units"),
        (name = "Employees", description = "Employee records"),
        (name = "Attendance", description = "Daily check-in and check-out"),
        (name = "Leaves", description = "Leave requests and approvals"),
        (name = "Payroll", description = "Monthly payroll records"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "ExitInterviews", description = "Offboarding interviews"),
        (name = "Reports", description = "Aggregated HR reports")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "System",
    security(())
)]
fn health_doc() {}

#[utoipa::path(
    get,
    path = "/api/info",
    responses((status = 200, body = ApiInfo)),
    tag = "System",
    security(())
)]
fn info_doc() {}

// ---- auth ----

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "Auth",
    security(())
)]
fn register_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses((status = 200, description = "Signed-in user", body = UserResponse)),
    tag = "Auth"
)]
fn me_doc() {}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordRequest,
    responses((status = 204, description = "Password changed")),
    tag = "Auth"
)]
fn change_password_doc() {}

// ---- users ----

#[utoipa::path(
    get,
    path = "/api/users",
    params(PaginationQuery),
    responses((status = 200, body = PaginatedResponse<UserResponse>)),
    tag = "Users"
)]
fn list_users_doc() {}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, body = UserResponse), (status = 404, body = ErrorResponse)),
    tag = "Users"
)]
fn get_user_doc() {}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUser,
    responses((status = 200, body = UserResponse)),
    tag = "Users"
)]
fn update_user_doc() {}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Cannot delete own account", body = ErrorResponse)
    ),
    tag = "Users"
)]
fn delete_user_doc() {}

// ---- departments ----

#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, body = [DepartmentResponse])),
    tag = "Departments"
)]
fn list_departments_doc() {}

#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department ID")),
    responses((status = 200, body = DepartmentResponse)),
    tag = "Departments"
)]
fn get_department_doc() {}

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartment,
    responses(
        (status = 201, body = DepartmentResponse),
        (status = 409, description = "Duplicate name", body = ErrorResponse)
    ),
    tag = "Departments"
)]
fn create_department_doc() {}

#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department ID")),
    request_body = UpdateDepartment,
    responses((status = 200, body = DepartmentResponse)),
    tag = "Departments"
)]
fn update_department_doc() {}

#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 409, description = "Department still has employees", body = ErrorResponse)
    ),
    tag = "Departments"
)]
fn delete_department_doc() {}

// ---- employees ----

#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses((status = 200, body = PaginatedResponse<Employee>)),
    tag = "Employees"
)]
fn list_employees_doc() {}

#[utoipa::path(
    get,
    path = "/api/employees/me",
    responses((status = 200, body = Employee), (status = 404, body = ErrorResponse)),
    tag = "Employees"
)]
fn my_employee_doc() {}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee ID")),
    responses((status = 200, body = Employee)),
    tag = "Employees"
)]
fn get_employee_doc() {}

#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, body = Employee),
        (status = 400, description = "Unknown department", body = ErrorResponse),
        (status = 409, description = "Duplicate employee code", body = ErrorResponse)
    ),
    tag = "Employees"
)]
fn create_employee_doc() {}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses((status = 200, body = Employee)),
    tag = "Employees"
)]
fn update_employee_doc() {}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee ID")),
    responses((status = 204, description = "Deleted")),
    tag = "Employees"
)]
fn delete_employee_doc() {}

// ---- attendance ----

#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckInOutRequest,
    responses(
        (status = 201, body = AttendanceRecord),
        (status = 409, description = "Already checked in today", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn check_in_doc() {}

#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body = CheckInOutRequest,
    responses(
        (status = 200, body = AttendanceRecord),
        (status = 400, description = "No open record for today", body = ErrorResponse)
    ),
    tag = "Attendance"
)]
fn check_out_doc() {}

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses((status = 200, body = [AttendanceRecord])),
    tag = "Attendance"
)]
fn list_attendance_doc() {}

#[utoipa::path(
    get,
    path = "/api/attendance/today",
    params(EmployeeParam),
    responses((status = 200, description = "Today's record, or null", body = AttendanceRecord)),
    tag = "Attendance"
)]
fn today_attendance_doc() {}

// ---- leaves ----

#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, body = LeaveRequest),
        (status = 409, description = "Overlapping request", body = ErrorResponse)
    ),
    tag = "Leaves"
)]
fn create_leave_doc() {}

#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveQuery),
    responses((status = 200, body = [LeaveRequest])),
    tag = "Leaves"
)]
fn list_leaves_doc() {}

#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    params(("id" = String, Path, description = "Leave request ID")),
    responses((status = 200, body = LeaveRequest)),
    tag = "Leaves"
)]
fn get_leave_doc() {}

#[utoipa::path(
    put,
    path = "/api/leaves/{id}/approve",
    params(("id" = String, Path, description = "Leave request ID")),
    request_body = ReviewLeaveRequest,
    responses(
        (status = 200, body = LeaveRequest),
        (status = 409, description = "Request is not pending", body = ErrorResponse)
    ),
    tag = "Leaves"
)]
fn approve_leave_doc() {}

#[utoipa::path(
    put,
    path = "/api/leaves/{id}/reject",
    params(("id" = String, Path, description = "Leave request ID")),
    request_body = ReviewLeaveRequest,
    responses((status = 200, body = LeaveRequest)),
    tag = "Leaves"
)]
fn reject_leave_doc() {}

#[utoipa::path(
    delete,
    path = "/api/leaves/{id}",
    params(("id" = String, Path, description = "Leave request ID")),
    responses((status = 200, description = "Cancelled", body = LeaveRequest)),
    tag = "Leaves"
)]
fn cancel_leave_doc() {}

// ---- payroll ----

#[utoipa::path(
    post,
    path = "/api/payroll/generate",
    request_body = GeneratePayrollRequest,
    responses(
        (status = 201, body = PayrollRecord),
        (status = 409, description = "Payroll already generated for the period", body = ErrorResponse)
    ),
    tag = "Payroll"
)]
fn generate_payroll_doc() {}

#[utoipa::path(
    get,
    path = "/api/payroll",
    params(PayrollQuery),
    responses((status = 200, body = [PayrollRecord])),
    tag = "Payroll"
)]
fn list_payroll_doc() {}

#[utoipa::path(
    get,
    path = "/api/payroll/{id}",
    params(("id" = String, Path, description = "Payroll record ID")),
    responses((status = 200, body = PayrollRecord)),
    tag = "Payroll"
)]
fn get_payroll_doc() {}

#[utoipa::path(
    put,
    path = "/api/payroll/{id}/pay",
    params(("id" = String, Path, description = "Payroll record ID")),
    responses((status = 200, body = PayrollRecord)),
    tag = "Payroll"
)]
fn pay_payroll_doc() {}

#[utoipa::path(
    delete,
    path = "/api/payroll/{id}",
    params(("id" = String, Path, description = "Payroll record ID")),
    responses((status = 204, description = "Deleted")),
    tag = "Payroll"
)]
fn delete_payroll_doc() {}

// ---- notifications ----

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationQuery),
    responses((status = 200, body = [Notification])),
    tag = "Notifications"
)]
fn list_notifications_doc() {}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses((status = 200, body = NotificationCount)),
    tag = "Notifications"
)]
fn unread_count_doc() {}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationRequest,
    responses((status = 201, description = "Number of notifications created", body = NotificationCount)),
    tag = "Notifications"
)]
fn create_notification_doc() {}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification ID")),
    responses((status = 200, body = Notification)),
    tag = "Notifications"
)]
fn mark_read_doc() {}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses((status = 200, description = "Number of notifications marked read", body = NotificationCount)),
    tag = "Notifications"
)]
fn mark_all_read_doc() {}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = String, Path, description = "Notification ID")),
    responses((status = 204, description = "Deleted")),
    tag = "Notifications"
)]
fn delete_notification_doc() {}

// ---- exit interviews ----

#[utoipa::path(
    get,
    path = "/api/exit-interviews",
    params(ExitInterviewQuery),
    responses((status = 200, body = [ExitInterview])),
    tag = "ExitInterviews"
)]
fn list_exit_interviews_doc() {}

#[utoipa::path(
    get,
    path = "/api/exit-interviews/{id}",
    params(("id" = String, Path, description = "Exit interview ID")),
    responses((status = 200, body = ExitInterview)),
    tag = "ExitInterviews"
)]
fn get_exit_interview_doc() {}

#[utoipa::path(
    post,
    path = "/api/exit-interviews",
    request_body = CreateExitInterview,
    responses((status = 201, body = ExitInterview)),
    tag = "ExitInterviews"
)]
fn create_exit_interview_doc() {}

#[utoipa::path(
    put,
    path = "/api/exit-interviews/{id}",
    params(("id" = String, Path, description = "Exit interview ID")),
    request_body = UpdateExitInterview,
    responses((status = 200, body = ExitInterview)),
    tag = "ExitInterviews"
)]
fn update_exit_interview_doc() {}

#[utoipa::path(
    delete,
    path = "/api/exit-interviews/{id}",
    params(("id" = String, Path, description = "Exit interview ID")),
    responses((status = 204, description = "Deleted")),
    tag = "ExitInterviews"
)]
fn delete_exit_interview_doc() {}

// ---- reports ----

#[utoipa::path(
    get,
    path = "/api/reports/summary",
    responses((status = 200, body = SummaryReport)),
    tag = "Reports"
)]
fn summary_report_doc() {}

#[utoipa::path(
    get,
    path = "/api/reports/departments",
    responses((status = 200, body = [DepartmentHeadcount])),
    tag = "Reports"
)]
fn department_report_doc() {}

#[utoipa::path(
    get,
    path = "/api/reports/attendance",
    params(ReportRangeQuery),
    responses((status = 200, body = [AttendanceReportRow])),
    tag = "Reports"
)]
fn attendance_report_doc() {}

#[utoipa::path(
    get,
    path = "/api/reports/attendance/export",
    params(ReportRangeQuery),
    responses((status = 200, description = "CSV attachment", content_type = "text/csv", body = String)),
    tag = "Reports"
)]
fn attendance_export_doc() {}

#[utoipa::path(
    get,
    path = "/api/reports/payroll",
    params(PeriodQuery),
    responses((status = 200, body = PayrollReport)),
    tag = "Reports"
)]
fn payroll_report_doc() {}

#[utoipa::path(
    get,
    path = "/api/reports/leaves",
    responses((status = 200, body = LeaveReport)),
    tag = "Reports"
)]
fn leave_report_doc() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_core_paths_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/auth/login",
            "/api/employees/{id}",
            "/api/payroll/generate",
            "/api/reports/attendance/export",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
