pub mod batch;
pub mod config;
pub mod logging;
pub mod pragma;
pub mod selector;
pub mod toolchain;
pub mod version;
