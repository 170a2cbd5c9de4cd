pub mod work_log;
