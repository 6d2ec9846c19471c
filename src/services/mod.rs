pub mod assignments;
pub mod courses;
pub mod grades;
pub mod reports;
pub mod submissions;
pub mod users;

pub use assignments::AssignmentService;
pub use courses::CourseService;
pub use grades::GradeService;
pub use reports::ReportService;
pub use submissions::SubmissionService;
pub use users::UserService;

use actix_web::HttpRequest;
use std::sync::Arc;

use crate::storage::Storage;

// 从 app data 取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}
