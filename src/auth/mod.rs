//! Session credential and anti-forgery token provisioning.
//!
//! The session credential is an opaque cookie value read through the
//! `CredentialSource` trait; the execution context cannot rely on
//! automatic cookie attachment, so the client sends it explicitly. The
//! anti-forgery token is cached in memory with a persistent fallback and
//! echoed back on every state-mutating call.

pub mod constants;
pub mod errors;
pub mod impls;
pub mod traits;
pub mod types;

pub use errors::AuthError;
pub use traits::CredentialSource;
pub use types::{CsrfTokenManager, StaticCredentialSource};
