use thiserror::Error;

/// Reasons a single Retrosheet record can't be turned into a typed event.
///
/// Each variant carries the raw text that failed so a bad game can be
/// located in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unrecognized play result `{code}` in descriptor `{descriptor}`")]
    UnrecognizedOutcome { code: String, descriptor: String },

    #[error("Unrecognized play modifier `{code}` in descriptor `{descriptor}`")]
    UnrecognizedModifier { code: String, descriptor: String },

    #[error("Malformed record ({reason}): {record}")]
    MalformedRecord { reason: String, record: String },
}

impl ParseError {
    pub(crate) fn malformed(reason: impl Into<String>, record: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
            record: record.into(),
        }
    }
}
