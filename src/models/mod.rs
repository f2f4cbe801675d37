pub mod error;
pub mod mod_def;
pub mod modpack;
pub mod solution;
