//! Services behind the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own storage, background work and outbound delivery so
//! route handlers stay focused on protocol translation.

pub mod blobs;
pub mod submission;
pub mod video_jobs;
