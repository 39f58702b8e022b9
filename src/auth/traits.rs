// 3rd party crates
use async_trait::async_trait;

// Current module imports
use super::errors::AuthError;

/// Source of the session credential attached to authenticated requests.
///
/// The value is the full cookie pair (`name=value`) for the backend
/// origin. `Ok(None)` means no session is available; the request proceeds
/// unauthenticated and the server decides. A browser host implements this
/// over its cookie API; tests and the CLI use a static value.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn session_cookie(&self) -> Result<Option<String>, AuthError>;
}
