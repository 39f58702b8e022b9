// 3rd party crates
use thiserror::Error;

/// Custom error type for admission control.
///
/// These are the only failures the limiter itself produces; an admitted
/// operation's own errors pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThrottleError {
    #[error("Request queue is full ({size} pending)")]
    QueueFull { size: usize },

    #[error("Request was cancelled by a rate limiter reset")]
    Cancelled,
}
