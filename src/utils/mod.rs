pub mod extractor;
pub mod flash;
pub mod form;
pub mod jwt;
pub mod multipart;
pub mod parameter_error_handler;
pub mod password;
pub mod pricing;
pub mod progress;
pub mod slug;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeAssignmentId, SafeCountryId, SafeCourseId, SafePaymentId, SafeStateId, SafeTrainerId,
    SafeVideoId,
};
pub use flash::{
    form_error, form_error_with, redirect_to, redirect_with_error, redirect_with_notice,
    render_page, server_error,
};
pub use parameter_error_handler::{form_error_handler, json_error_handler, query_error_handler};
pub use sql::escape_like_pattern;
