pub mod assignments;

pub mod courses;

pub mod grades;

pub mod submissions;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use courses::configure_course_routes;
pub use grades::configure_grade_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(configure_user_routes)
        .configure(configure_course_routes)
        .configure(configure_assignment_routes)
        .configure(configure_submission_routes)
        .configure(configure_grade_routes);
}

#[cfg(test)]
mod tests;
