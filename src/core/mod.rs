pub mod grid;
pub mod stats;
pub mod table;
