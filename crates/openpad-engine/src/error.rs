//! Engine error types.

use openpad_hid_common::HidCommonError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown controller session: {0}")]
    UnknownDevice(u32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] HidCommonError),
}

pub type EngineResult<T> = Result<T, EngineError>;
