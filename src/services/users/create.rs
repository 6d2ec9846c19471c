use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode, users::requests::CreateUserRequest};
use crate::utils::validate::validate_user;

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let errors = validate_user(&user_data);
    if !errors.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors)));
    }

    let storage = service.get_storage(request);

    // 用户名唯一
    match storage.get_user_by_username(&user_data.username).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Username already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check username: {e}"),
                )),
            );
        }
    }

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.username, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created")))
        }
        Err(e) => {
            error!("User creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("User creation failed: {e}"),
                )),
            )
        }
    }
}
