//! Estimate Reliance: claim intake and creative-labs generation service.
//!
//! ARCHITECTURE
//! ============
//! Every studio follows the same pipeline: collect form fields, validate the
//! minimum required set, compose a structured prompt, call the generation
//! gateway, then surface the result or the failure. The layers, leaves first:
//!
//! - `upload`: file to base64 + MIME (`EncodedFile`).
//! - `prompt`: typed field tables and the pure prompt composer.
//! - `gateway`: the only boundary to the generative AI provider.
//! - `studio`: the generic request-lifecycle state machine and per-asset kinds.
//! - `view`: screen routing and the capability gate.
//! - `services`: submission side channel, blob store, background video jobs.
//! - `routes`: axum HTTP surface over all of the above.

pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod prompt;
pub mod routes;
pub mod services;
pub mod state;
pub mod studio;
pub mod upload;
pub mod view;
