//! HTTP plumbing shared by the paginator and the HTTP sink.
//!
//! Everything goes through the [`HttpClient`] trait so credentials can be
//! layered on with the wrappers in [`auth`] and tests can swap in a fake.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;
