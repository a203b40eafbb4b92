//! Crate error types

/// Convenience alias for bridge results
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Error type for bridge operations
///
/// State-store failures never surface here: the store reports them as
/// boolean failures or default values at its own boundary (see
/// [`crate::store::StateStore`]). This type covers the transport layer.
#[derive(Debug)]
pub enum BridgeError {
    /// Transport-level I/O failure (bind, accept, serve)
    Io(std::io::Error),
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(e: std::io::Error) -> Self {
        BridgeError::Io(e)
    }
}
