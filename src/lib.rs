//! Tutor Chat - learner-facing client for a Socratic tutoring service
//!
//! A learner opens a module, keeps one or more conversation threads with the
//! remote tutor, and can export any thread as a transcript. When the tutor
//! can't be reached the thread continues with a reflective question instead
//! of an error.

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod conversation;
pub mod export;
pub mod session;
pub mod state_machine;
pub mod tutor;
