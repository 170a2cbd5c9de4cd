pub mod api_client;

pub use api_client::{format_for_api, format_from_api, HttpWorkLogApi, WorkLogApi};
