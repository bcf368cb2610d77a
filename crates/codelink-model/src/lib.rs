pub mod mapping;
pub mod record;

pub use mapping::Mapping;
pub use record::{CatalogId, CodeRecord};
