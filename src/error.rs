use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Expected element is missing: {0}")]
    Missing(String),

    #[error("No listing table found for generation {generation}")]
    TableNotFound { generation: u32 },

    #[error("No {pipeline} listing could be collected for any requested generation")]
    NoData { pipeline: &'static str },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Fetch Error: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        Error::Missing(what.into())
    }
}
