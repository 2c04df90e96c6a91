/// Errors surfaced by the client core.
///
/// `Display` is what views store and show, so API errors render the
/// server's message verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Reading or writing locally persisted state failed.
    #[error("Local storage error: {0}")]
    Store(String),

    #[error("Not signed in")]
    Unauthenticated,

    /// A booking for the same slot is still outstanding.
    #[error("A booking for this time slot is already in progress")]
    BookingInFlight,

    /// The slot was full when availability was last fetched.
    #[error("This time slot is full")]
    SlotFull,
}
