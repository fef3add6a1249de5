//! Error types for the HTTP surface.

use std::io;

use thiserror::Error;

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The server loop failed.
    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}
