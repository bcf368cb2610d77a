#![deny(unsafe_code)]

pub mod engine;
pub mod error;
pub mod import;
pub mod score;
pub mod store;

pub use engine::{MATCH_THRESHOLD, ResolutionEngine};
pub use error::{ImportError, ResolveError, StoreError};
pub use import::import_all;
pub use score::{BestMatch, best_match, dice_similarity};
pub use store::{InsertOutcome, MappingStore};
