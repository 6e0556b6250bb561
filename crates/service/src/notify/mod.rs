//! Notification fan-out: the one piece of real selection logic.
//!
//! Given a stored blood request, pick every donor whose blood type matches
//! and whose preferences allow the notification, and queue one notification
//! row per match. Matching is exact equality on the blood type label and a
//! missing preference row counts as opted in.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::NotifyService;
