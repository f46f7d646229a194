use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("open {port}: {reason}")]
    Open { port: String, reason: String },
    #[error("serial write failed: {0}")]
    Write(String),
    #[error("port is not open")]
    NotOpen,
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
