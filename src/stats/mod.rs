pub mod summary;
pub mod threshold;
pub mod window;
