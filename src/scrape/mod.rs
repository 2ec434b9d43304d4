pub mod entities;
pub mod normalize;
pub mod table;

pub use normalize::normalize_rows;
pub use table::extract_table;
