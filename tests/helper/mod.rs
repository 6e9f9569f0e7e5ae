pub mod toolchain;

pub use toolchain::{
    RecordingInstaller, StaticCatalogProvider, UnavailableCatalogProvider, catalog,
};
