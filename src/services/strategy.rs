use crate::error::EngineError;

/// Result of one step in a fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    /// Transient condition; the caller should be told to try again.
    Retryable(EngineError),
    /// This step cannot produce a value; move on to the next one.
    Fatal(EngineError),
}

impl<T> From<Result<T, EngineError>> for Outcome<T> {
    fn from(res: Result<T, EngineError>) -> Self {
        match res {
            Ok(v) => Outcome::Success(v),
            Err(e) if e.is_retryable() => Outcome::Retryable(e),
            Err(e) => Outcome::Fatal(e),
        }
    }
}
