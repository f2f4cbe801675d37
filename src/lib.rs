//! Core engine for a modpack manager.
//!
//! The presentation layer (GUI or otherwise) drives everything through a
//! handful of entry points: [`core::resolver::resolve`] to compute the
//! sets of mods that satisfy a pack's dependency constraints,
//! [`core::task_service::TaskService::submit`] to queue an
//! install-and-launch task, and the change events emitted by
//! [`core::store::Datastore`] and the individual task objects.

pub mod core;
pub mod models;
pub mod utils;
