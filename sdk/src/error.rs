use crate::schema::SchemaError;
use reqwest::Error as ReqwestError;
use std::fmt;
use std::io::Error as IoError;

#[derive(Debug)]
pub enum Error {
    /// Metadata or configuration did not match its declared schema.
    SchemaViolation(Vec<SchemaError>),
    /// Asset counts are inconsistent with each other or with the declared size.
    CountMismatch(String),
    PayoutInvalid(String),
    /// The config has no content address; assets must be uploaded first.
    MissingContentAddress,
    /// A re-read after a write did not return the desired value.
    ReconcileMismatch { expected: String, actual: String },
    InvalidAmount(String),
    UnknownNetwork(String),
    InvalidTimestamp(chrono::ParseError),
    InvalidJson(serde_json::Error),
    RpcError { code: i64, message: String },
    UnexpectedResponse(String),
    StorageServerError {
        status: u16,
        message: serde_json::Value,
    },
    CommandFailed { command: String, stderr: String },
    FileSystemError(IoError),
    ReqwestError(ReqwestError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SchemaViolation(errors) => {
                writeln!(f, "schema validation failed:")?;
                for error in errors {
                    writeln!(f, "  {}", error)?;
                }
                Ok(())
            }
            Error::CountMismatch(message) => write!(f, "asset count mismatch: {}", message),
            Error::PayoutInvalid(message) => write!(f, "invalid payout map: {}", message),
            Error::MissingContentAddress => {
                write!(
                    f,
                    "assets are not uploaded, upload the assets before deploying"
                )
            }
            Error::ReconcileMismatch { expected, actual } => write!(
                f,
                "remote value is {} after write, expected {}",
                actual, expected
            ),
            Error::InvalidAmount(amount) => write!(f, "invalid NEAR amount: {}", amount),
            Error::UnknownNetwork(name) => {
                write!(f, "unknown network {:?}, expected mainnet or testnet", name)
            }
            Error::InvalidTimestamp(e) => write!(f, "invalid timestamp: {}", e),
            Error::InvalidJson(e) => write!(f, "invalid JSON: {}", e),
            Error::RpcError { code, message } => write!(f, "RPC error {}: {}", code, message),
            Error::UnexpectedResponse(message) => {
                write!(f, "unexpected RPC response: {}", message)
            }
            Error::StorageServerError { status, message } => {
                write!(f, "storage server error {}: {}", status, message)
            }
            Error::CommandFailed { command, stderr } => {
                write!(f, "command {} failed: {}", command, stderr)
            }
            Error::FileSystemError(e) => write!(f, "filesystem error: {}", e),
            Error::ReqwestError(e) => write!(f, "http error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Self::FileSystemError(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidJson(e)
    }
}

impl From<ReqwestError> for Error {
    fn from(e: ReqwestError) -> Self {
        Self::ReqwestError(e)
    }
}

impl From<chrono::ParseError> for Error {
    fn from(e: chrono::ParseError) -> Self {
        Self::InvalidTimestamp(e)
    }
}
