pub mod catalog;
mod errors;
mod rng;
pub mod table;

pub use catalog::OutcomeCatalog;
pub use errors::OutcomeTableError;
pub use rng::SharedRng;
pub use table::{Draw, OutcomeEffect, OutcomeEntry, OutcomeTable, StatDelta};
