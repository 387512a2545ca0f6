use starknetid_common::CodecError;
use thiserror::Error;

/// Fatal decode faults. An unrecognized Transfer layout is not one of these;
/// it decodes to `Ok(None)`.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("missing value for `{field}` at position {position}")]
    MissingValue { field: &'static str, position: usize },
    #[error("label count {count} is out of range")]
    LabelCountOverflow { count: String },
    #[error("unknown record kind {0:?}")]
    UnknownKind(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
