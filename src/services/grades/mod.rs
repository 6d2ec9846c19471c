pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::GradeInputRequest;
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => super::storage_from_request(request),
        }
    }

    /// 录入或覆盖评分
    pub async fn upsert_grade(
        &self,
        grade_data: GradeInputRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_grade(self, grade_data, request).await
    }
}
