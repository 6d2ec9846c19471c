pub mod grade;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::SubmitWorkRequest;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    // 提交或重新提交作业
    pub async fn submit_work(
        &self,
        assignment_id: i64,
        submission_data: SubmitWorkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_work(self, assignment_id, submission_data, request).await
    }

    // 查看某次提交的评分
    pub async fn get_submission_grade(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::get_submission_grade(self, submission_id, request).await
    }
}
