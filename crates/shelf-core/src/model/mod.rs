// ── Domain model ──
//
// Records are an id plus a flattened field set. Each field set names the
// table it lives in.

pub mod movie;
pub mod product;
pub mod record;

pub use movie::Movie;
pub use product::Product;
pub use record::{Fields, Record, RecordId};
