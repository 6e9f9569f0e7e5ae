//! Catalog provider implementations

pub mod binaries;
pub mod cached;
pub mod file;

pub use binaries::BinariesCatalogProvider;
pub use cached::CachedCatalogProvider;
pub use file::FileCatalogProvider;
