pub mod any_date;
pub mod coordinate;
pub mod data_source;
pub mod parameter;
pub mod sample;
