pub mod task;
pub mod wire_format;
pub mod work_log;

pub use task::*;
pub use work_log::*;
