use thiserror::Error;

/// Errors surfaced by the encoders and the download glue.
///
/// Malformed colors and unsupported geometries never show up here, they are
/// recovered where they occur.
#[derive(Debug, Error)]
pub enum Error {
    /// Scratch storage could not be acquired, written or read back.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive could not be assembled.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Input could not be parsed as GeoJSON.
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Attribute field names are limited to 10 ASCII characters.
    #[error("invalid attribute field name: {0:?}")]
    FieldName(String),

    /// Fields have to be declared before the first record is written.
    #[error("field {0:?} declared after records were written")]
    FieldAfterRecord(String),

    /// A record carried a different number of values than there are fields.
    #[error("record has {actual} values, expected {expected}")]
    RecordArity { expected: usize, actual: usize },

    /// The binary formats use 32-bit lengths and offsets.
    #[error("{0} exceeds the size limits of the format")]
    TooLarge(&'static str),

    #[error("unknown region {0:?}, expected NSW or QLD")]
    UnknownRegion(String),

    #[error("no features provided")]
    NoFeatures,
}
