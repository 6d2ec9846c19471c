use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::FieldError;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::grades::requests::GradeInputRequest;
use crate::models::users::requests::CreateUserRequest;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static FILENAME_UNSAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9-]+").expect("Invalid filename regex"));

pub const MAX_DISPLAY_NAME_LEN: usize = 64;
pub const MAX_COURSE_NAME_LEN: usize = 128;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_FEEDBACK_LEN: usize = 4000;

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：3 <= x <= 32
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_user(req: &CreateUserRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_username(&req.username) {
        errors.push(FieldError::new("username", msg));
    }
    if let Some(name) = &req.display_name
        && name.chars().count() > MAX_DISPLAY_NAME_LEN
    {
        errors.push(FieldError::new(
            "display_name",
            format!("Display name must be at most {MAX_DISPLAY_NAME_LEN} characters"),
        ));
    }

    errors
}

pub fn validate_course(req: &CreateCourseRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let name = req.name.trim();

    if name.is_empty() {
        errors.push(FieldError::new("name", "Course name must not be empty"));
    } else if name.chars().count() > MAX_COURSE_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            format!("Course name must be at most {MAX_COURSE_NAME_LEN} characters"),
        ));
    }

    errors
}

/// 作业配置校验：满分必须为正数，权重在 (0, 1] 内
pub fn validate_assignment(req: &CreateAssignmentRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let title = req.title.trim();

    if title.is_empty() {
        errors.push(FieldError::new("title", "Title must not be empty"));
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.push(FieldError::new(
            "title",
            format!("Title must be at most {MAX_TITLE_LEN} characters"),
        ));
    }

    if !req.max_mark.is_finite() || req.max_mark <= 0.0 {
        errors.push(FieldError::new("max_mark", "Max mark must be greater than zero"));
    }

    if !req.weight.is_finite() || req.weight <= 0.0 || req.weight > 1.0 {
        errors.push(FieldError::new(
            "weight",
            "Weight must be greater than 0 and at most 1",
        ));
    }

    errors
}

/// 评分输入校验，`max_mark` 来自所属作业
pub fn validate_grade_input(req: &GradeInputRequest, max_mark: f64) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !req.raw_mark.is_finite() {
        errors.push(FieldError::new("raw_mark", "Raw mark must be a number"));
    } else if req.raw_mark < 0.0 {
        errors.push(FieldError::new("raw_mark", "Raw mark must not be negative"));
    } else if req.raw_mark > max_mark {
        errors.push(FieldError::new(
            "raw_mark",
            format!("Raw mark must not exceed the assignment max mark ({max_mark})"),
        ));
    }

    if let Some(feedback) = &req.feedback
        && feedback.chars().count() > MAX_FEEDBACK_LEN
    {
        errors.push(FieldError::new(
            "feedback",
            format!("Feedback must be at most {MAX_FEEDBACK_LEN} characters"),
        ));
    }

    errors
}

/// 文件名只保留 ASCII 字母、数字与连字符，其他连续字符替换为单个 `_`
pub fn sanitize_filename(name: &str) -> String {
    FILENAME_UNSAFE_RE
        .replace_all(name, "_")
        .trim_matches('_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentType;
    use crate::models::users::entities::UserRole;

    fn assignment_req(max_mark: f64, weight: f64) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            title: "Essay".to_string(),
            max_mark,
            weight,
            due_date: chrono::Utc::now(),
            assignment_type: AssignmentType::Written,
        }
    }

    fn grade_req(raw_mark: f64) -> GradeInputRequest {
        GradeInputRequest {
            assignment_id: 1,
            participant_id: 2,
            raw_mark,
            feedback: None,
            marker_id: 3,
        }
    }

    #[test]
    fn test_username() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
    }

    #[test]
    fn test_user_request() {
        let req = CreateUserRequest {
            username: "x".to_string(),
            display_name: Some("y".repeat(65)),
            role: UserRole::Student,
        };
        let errors = validate_user(&req);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "display_name"]);
    }

    #[test]
    fn test_course_name_required() {
        let req = CreateCourseRequest {
            name: "   ".to_string(),
            description: None,
        };
        assert_eq!(validate_course(&req).len(), 1);
    }

    #[test]
    fn test_assignment_rejects_zero_max_mark_and_weight() {
        assert!(validate_assignment(&assignment_req(20.0, 0.3)).is_empty());
        assert!(validate_assignment(&assignment_req(20.0, 1.0)).is_empty());

        let errors = validate_assignment(&assignment_req(0.0, 0.0));
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["max_mark", "weight"]);

        assert_eq!(validate_assignment(&assignment_req(10.0, 1.5)).len(), 1);
        assert_eq!(validate_assignment(&assignment_req(f64::NAN, 0.5)).len(), 1);
    }

    #[test]
    fn test_grade_input_range() {
        assert!(validate_grade_input(&grade_req(0.0), 20.0).is_empty());
        assert!(validate_grade_input(&grade_req(20.0), 20.0).is_empty());
        assert_eq!(validate_grade_input(&grade_req(-1.0), 20.0)[0].field, "raw_mark");
        assert_eq!(validate_grade_input(&grade_req(20.5), 20.0).len(), 1);
        assert_eq!(validate_grade_input(&grade_req(f64::INFINITY), 20.0).len(), 1);
    }

    #[test]
    fn test_feedback_length() {
        let mut req = grade_req(5.0);
        req.feedback = Some("a".repeat(MAX_FEEDBACK_LEN + 1));
        assert_eq!(validate_grade_input(&req, 10.0)[0].field, "feedback");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Rust 101"), "Rust_101");
        assert_eq!(sanitize_filename("../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("***"), "");
    }
}
