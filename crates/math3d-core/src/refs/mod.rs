pub mod table;

pub use table::{RefId, RefTable};
