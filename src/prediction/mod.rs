pub mod blender;
pub mod indices;
pub mod rules;
pub mod scorer;
