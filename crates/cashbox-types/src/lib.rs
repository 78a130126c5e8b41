pub mod api;
pub mod denomination;

pub use denomination::{CountTotals, Denomination, face_value_of, tally};
