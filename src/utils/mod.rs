pub mod events;
pub mod file;
pub mod log;
pub mod version;
