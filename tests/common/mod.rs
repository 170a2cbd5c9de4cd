pub mod app;
pub mod factory;
pub mod frontend;

#[allow(unused_imports)]
pub use app::{test_config, LiveServer, TestApp};
#[allow(unused_imports)]
pub use factory::Factory;
#[allow(unused_imports)]
pub use frontend::RecordingFrontend;
