use thiserror::Error;

#[derive(Error, Debug)]
pub enum SigwallError {
    #[error("Entropy source unavailable: {0}")]
    Entropy(String),

    #[error("Remote transport failed: {0}")]
    Transport(String),

    #[error("Remote generation failed: {0}")]
    RemoteFailure(String),

    #[error("Malformed remote payload: {0}")]
    MalformedPayload(String),

    #[error("Decoding failed: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Local engine task failed: {0}")]
    Task(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SigwallError>;
