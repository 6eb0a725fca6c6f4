use thiserror::Error;

/// Error taxonomy for the assistant.
///
/// External-service failures are kept in distinct categories so callers can
/// decide user-facing behavior per tag. A conflicting booking is *not* an
/// error: it is the `SlotUnavailable` variant of
/// [`BookingResult`](crate::models::meeting::BookingResult).
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Network error, timeout, rate limit, or 5xx from an external service.
    /// Recoverable by retry; never conflated with "slot busy".
    #[error("Transient external failure: {0}")]
    Transient(String),

    /// Missing, expired, or invalid credentials for an external service.
    /// Indicates a configuration problem, not transient load.
    #[error("Authorization failure: {0}")]
    Authorization(String),

    /// The availability check passed but the subsequent create-event call
    /// failed. Reported to the user as "please retry".
    #[error("Booking submission failed: {0}")]
    BookingFailed(String),

    /// The slot scan covered the whole horizon without collecting enough
    /// free slots.
    #[error("No free slots within the next {days} days")]
    HorizonExhausted { days: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("External service error: {0}")]
    External(#[from] eyre::Report),
}

pub type AssistantResult<T> = Result<T, AssistantError>;
