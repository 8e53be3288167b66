pub mod series;
pub mod table;
