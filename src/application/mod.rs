//! Application layer: the BR Code encoder and the service that serves the
//! landing page's payload from its stored configuration.
//!
//! `PixPayloadEncoder` is the single entry point for building and checking
//! payloads. `PixService` wires it to a `ConfigSource`.

pub mod encoder;
pub mod service;
