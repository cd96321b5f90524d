pub mod catalog;
pub mod draft;
pub mod record;
pub mod schema;

pub use draft::{DraftAction, DraftError, FormDraft};
pub use record::EntityRecord;
pub use schema::{Endpoint, EntitySchema, FilterJoin, FilterSpec};
