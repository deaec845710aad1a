//! In-memory table snapshots and their CSV wire format.

mod codec;
mod table;

pub use codec::{decode_csv, encode_csv};
pub use table::{Row, TableSnapshot};
