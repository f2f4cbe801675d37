pub mod flow;
pub mod installer;
pub mod launcher;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod task_service;
