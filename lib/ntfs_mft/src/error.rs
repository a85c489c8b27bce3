use std::ops::Range;
use thiserror::Error;

/// A named field didn't fit inside the slice it was read from
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {name} at {range:?} is outside of slice of length {len}")]
pub struct FieldOutOfRange {
    pub name : &'static str,
    pub range : Range<usize>,
    pub len : usize,
}

/// Why the attribute list walk gave up
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("attribute header runs past the end of the record")]
    OutOfBounds,

    #[error("attribute length is zero")]
    ZeroLength,

    #[error("attribute length {0} is smaller than an attribute header")]
    LengthTooSmall(u32),

    #[error("attribute length {length} runs past the end of the record, {available} bytes available")]
    LengthPastEnd { length : u32, available : usize },
}

/// Structural failures, the whole record is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid record signature, expected \"FILE\" got {found:02x?}")]
    InvalidSignature { found : Vec<u8> },

    #[error("record header truncated, got {len} bytes, need at least {required}")]
    TruncatedHeader { len : usize, required : usize },

    #[error("malformed attribute list at offset {offset:#x}: {reason}")]
    MalformedAttributeList { offset : usize, reason : MalformedReason },
}

/// Failures scoped to a single attribute, the rest of the record still decodes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("attribute {type_code:#x} has invalid length {len}, need at least {required}")]
    InvalidAttributeLength { type_code : u32, len : usize, required : usize },

    #[error("non resident standard information flag found")]
    UnexpectedNonResidentStandardInformation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp of {ticks:#x} ticks can't be represented")]
    Unparseable { ticks : u64 },
}

impl From<FieldOutOfRange> for RecordError {
    fn from(err : FieldOutOfRange) -> Self {
        RecordError::TruncatedHeader { len: err.len, required: err.range.end }
    }
}
