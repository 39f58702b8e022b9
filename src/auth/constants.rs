/// Header carrying the anti-forgery token, both directions: issued by the
/// server on the token endpoint response, echoed by the client on every
/// state-mutating request. Compared case-insensitively.
pub const CSRF_TOKEN_HEADER: &str = "x-csrf-token";

/// Endpoint that issues a fresh anti-forgery token.
pub const CSRF_TOKEN_ENDPOINT: &str = "/auth/csrf";

/// Persistent-store key for the cached anti-forgery token.
pub const CSRF_TOKEN_STORAGE_KEY: &str = "csrf_token";
