pub mod catalog;
pub mod engine;

pub use catalog::Creative;
pub use engine::CatalogSource;
