pub mod extractor;
pub mod parameter_error_handler;
pub mod sql;
pub mod validate;

pub use extractor::{SafeCourseIdI64, SafeIDI64, SafeParticipantIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
pub use validate::sanitize_filename;
