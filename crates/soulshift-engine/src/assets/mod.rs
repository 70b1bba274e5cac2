pub mod level;
pub mod manifest;
pub mod registry;
