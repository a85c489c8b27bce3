//! Read-only decoding of NTFS Master File Table (FILE) records.
//!
//! ```no_run
//! use ntfs_mft::MftRecord;
//!
//! # let bytes = [0u8; 1024];
//! match MftRecord::decode(&bytes) {
//!     Ok(record) => println!("#{} deleted: {}", record.header.record_number, record.header.flags.deleted),
//!     Err(err) => println!("bad record: {}", err),
//! }
//! ```

pub mod common;
pub mod error;
pub mod filetime;
pub mod mft_parser;
pub mod mft_types;
pub mod slice_utils;

pub use error::{AttributeError, FieldOutOfRange, MalformedReason, RecordError, TimestampError};
pub use filetime::RawFiletime;
pub use mft_parser::{decode_attribute, AttributeFailure, AttributeWalker, MftRecord, MftRecordsChunk, MftRecordsChunkIterator, RecordHeader};
pub use mft_types::{Attribute, AttributeHeader, AttributeType, RecordHeaderFlags, ResidencyFlag, StandardInformationAttribute};
