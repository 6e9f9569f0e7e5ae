//! Toolchain layer
//!
//! - [`installer`]: `ToolchainInstaller` trait and its error types
//! - [`solc_select`]: installer delegating to the `solc-select` program
//! - [`switcher`]: provider + selector + installer workflow for one source file

pub mod installer;
pub mod solc_select;
pub mod switcher;

pub use installer::{ActivateError, InstallError, ToolchainInstaller};
pub use solc_select::SolcSelectInstaller;
pub use switcher::{SwitchError, ToolchainSwitcher};
