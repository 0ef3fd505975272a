use thiserror::Error;

use crate::models::ErrResponse;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: {1}")]
    Context(String, Box<Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Api error: {0:?}")]
    Api(ErrResponse),

    #[error("no usable response from transport: {0}")]
    Transport(String),

    #[error("user `{0}` not found")]
    UserNotFound(String),

    #[error("container cannot be resolved: {0}")]
    UnresolvableContainer(String),

    #[error("Url parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Config parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unexpected response format: {0}")]
    FormatError(String),
}

impl Error {
    /// Errors that stand for "the transport produced no usable response",
    /// as opposed to the remote service answering with a failure.
    pub fn is_transport_gap(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Network(_))
    }
}

pub trait Context<T, E> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e.into())))
    }
}
