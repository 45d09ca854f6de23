//! Resume vs job-description matching.
//!
//! The core lives in [`matching`]: a resume [`matching::Document`] and a job
//! description go in, an immutable [`matching::MatchResult`] comes out. The
//! embedding backend is pluggable through [`embedding_client::EmbeddingProvider`].
//! The remaining modules are the HTTP service wrapped around it.

pub mod config;
pub mod embedding_client;
pub mod errors;
pub mod matching;
pub mod routes;
pub mod state;
