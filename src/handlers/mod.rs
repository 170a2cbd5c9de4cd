pub mod common;
pub mod work_log;

pub use common::{validate_optional, validate_required, IdParams};
pub use work_log::{
    create_work_log, delete_work_log, list_work_logs, update_work_log, CreatedResponse,
    MessageResponse, WorkLogRequest, WorkLogResponse,
};
