use log::{debug, trace, warn};
use std::collections::BTreeMap;

use crate::common::*;
use crate::error::{AttributeError, MalformedReason, RecordError};
use crate::mft_types::*;
use crate::slice_utils::*;

/// The fixed FILE record preamble
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub record_number : u32,
    pub attributes_offset : u16,
    pub flags : RecordHeaderFlags,
    pub sequence_number : u16,
    pub hard_link_count : u16,
    pub base_record : u64,
    /// Every stride ends in the update sequence number, i.e. the record was written out whole.
    /// Only checked, the original bytes are never swapped back in.
    pub fixup_okay : bool,
}

impl RecordHeader {
    const MR_SIGNATURE : MftDataField<[u8; 4]> = MftDataField::new("Signature", FRSH_SIGNATURE_OFFSET);
    const MR_UPDATE_SEQUENCE_OFFSET : MftDataField<u16> = MftDataField::new("FixupArrayOffset", FRSH_UPDATE_SEQUENCE_OFFSET_OFFSET);
    const MR_UPDATE_SEQUENCE_SIZE : MftDataField<u16> = MftDataField::new("FixupArraySize", FRSH_UPDATE_SEQUENCE_SIZE_OFFSET);
    const MR_SEQUENCE_NUMBER : MftDataField<u16> = MftDataField::new("SequenceNumber", FRSH_SEQUENCE_NUMBER_OFFSET);
    const MR_HARD_LINK_COUNT : MftDataField<u16> = MftDataField::new("HardLinkCount", FRSH_HARD_LINK_COUNT_OFFSET);
    const MR_FIRST_ATTRIBUTE_OFFSET : MftDataField<u16> = MftDataField::new("FirstAttributeOffset", FRSH_FIRST_ATTRIBUTE_OFFSET);
    const MR_FLAGS : MftDataField<u8> = MftDataField::new("Flags", FRSH_FLAGS_OFFSET);
    const MR_BASE_RECORD_ADDRESS : MftDataField<u48> = MftDataField::new("BaseRecordAddress", FRSH_BASE_RECORD_OFFSET);
    const MR_RECORD_ID : MftDataField<u32> = MftDataField::new("MftRecordId", FRSH_RECORD_NUMBER_OFFSET);

    /// Validates the signature and length, then copies out the header fields.
    ///
    /// The attribute offset is not checked against the record here, a bad one shows up when the
    /// attributes are walked.
    pub fn parse(record : &[u8]) -> Result<Self, RecordError> {
        match Self::MR_SIGNATURE.read(record) {
            Ok(signature) if signature == EXPECTED_SIGNATURE => {},
            _ => {
                let found = record[..record.len().min(EXPECTED_SIGNATURE.len())].to_vec();
                return Err(RecordError::InvalidSignature { found });
            }
        }

        if record.len() < FRSH_MIN_LENGTH {
            return Err(RecordError::TruncatedHeader { len: record.len(), required: FRSH_MIN_LENGTH });
        }

        Ok(RecordHeader {
            record_number: Self::MR_RECORD_ID.read(record)?,
            attributes_offset: Self::MR_FIRST_ATTRIBUTE_OFFSET.read(record)?,
            flags: RecordHeaderFlags::parse(Self::MR_FLAGS.read(record)?),
            sequence_number: Self::MR_SEQUENCE_NUMBER.read(record)?,
            hard_link_count: Self::MR_HARD_LINK_COUNT.read(record)?,
            base_record: Self::MR_BASE_RECORD_ADDRESS.read(record)?.into(),
            fixup_okay: Self::check_fixup(record),
        })
    }

    fn check_fixup(record : &[u8]) -> bool {
        let (fixup_array_offset, fixup_array_size) = match (Self::MR_UPDATE_SEQUENCE_OFFSET.read(record), Self::MR_UPDATE_SEQUENCE_SIZE.read(record)) {
            (Ok(offset), Ok(size)) => (offset as usize, size as usize),
            _ => return false
        };

        // First entry is the expected value, then one replacement per stride
        if fixup_array_size < 2 {
            return false;
        }

        let expected_value = match record.get(fixup_array_offset..fixup_array_offset + 2) {
            Some(value) => value,
            None => return false
        };

        let fixup_okay = (1..fixup_array_size).all(|stride| {
            let end = stride * UPDATE_SEQUENCE_STRIDE;
            record.get(end - 2..end) == Some(expected_value)
        });

        if !fixup_okay {
            debug!("Bad fixup, expected {:02x?} at the end of {} strides", expected_value, fixup_array_size - 1);
        }
        fixup_okay
    }

    /// Extension records point back at their base record, base records point at nothing
    pub fn is_base_record(&self) -> bool {
        self.base_record == 0
    }

    pub fn attributes<'a>(&self, record : &'a [u8]) -> AttributeWalker<'a> {
        AttributeWalker::new(record, self.attributes_offset as usize)
    }
}

/// Walks the attribute list of a record, one attribute slice at a time.
///
/// Stops cleanly at the end marker. A broken length or running off the end of the record yields a
/// single `MalformedAttributeList` error and then nothing more, so callers see whatever was walked
/// before the damage.
#[derive(Debug, Clone)]
pub struct AttributeWalker<'a> {
    record : &'a [u8],
    attribute_offset : usize,
    finished : bool,
}

impl<'a> AttributeWalker<'a> {
    pub fn new(record : &'a [u8], first_attribute_offset : usize) -> Self {
        AttributeWalker { record, attribute_offset: first_attribute_offset, finished: false }
    }

    fn abort(&mut self, reason : MalformedReason) -> Option<Result<AttributeHeader<'a>, RecordError>> {
        warn!("Read invalid attribute at offset {:#x} ({}), skipping the rest of the record", self.attribute_offset, reason);
        self.finished = true;
        Some(Err(RecordError::MalformedAttributeList { offset: self.attribute_offset, reason }))
    }
}

impl<'a> Iterator for AttributeWalker<'a> {
    type Item = Result<AttributeHeader<'a>, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let remaining = match self.record.get(self.attribute_offset..) {
            Some(remaining) => remaining,
            None => return self.abort(MalformedReason::OutOfBounds)
        };

        let attribute_type_code = match AttributeHeader::ARH_TYPE_CODE.read(remaining) {
            Ok(type_code) => type_code,
            Err(_) => return self.abort(MalformedReason::OutOfBounds)
        };

        if attribute_type_code == ATTR_END_MARKER {
            self.finished = true;
            return None;
        }

        let record_length = match AttributeHeader::ARH_RECORD_LENGTH.read(remaining) {
            Ok(length) => length,
            Err(_) => return self.abort(MalformedReason::OutOfBounds)
        };

        if record_length == 0 {
            return self.abort(MalformedReason::ZeroLength);
        }
        if (record_length as usize) < ARH_MIN_LENGTH {
            return self.abort(MalformedReason::LengthTooSmall(record_length));
        }
        if record_length as usize > remaining.len() {
            return self.abort(MalformedReason::LengthPastEnd { length: record_length, available: remaining.len() });
        }

        let attribute = match AttributeHeader::new(&remaining[..record_length as usize], self.attribute_offset) {
            Ok(attribute) => attribute,
            Err(_) => return self.abort(MalformedReason::OutOfBounds)
        };

        trace!("Attribute {:#x} of length {} at offset {:#x}", attribute_type_code, record_length, self.attribute_offset);

        self.attribute_offset += record_length as usize;

        Some(Ok(attribute))
    }
}

/// Routes an attribute to its decoder by type code. `None` means we don't decode that kind.
pub fn decode_attribute(attribute : &AttributeHeader) -> Option<Result<Attribute, AttributeError>> {
    match attribute.get_attribute_type()? {
        AttributeType::StandardInformation => Some(
            StandardInformationAttribute::parse(attribute.get_slice()).map(Attribute::StandardInformation)
        ),
        _ => None
    }
}

/// An attribute that was found but failed to decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFailure {
    pub offset : usize,
    pub type_code : u32,
    pub error : AttributeError,
}

/// A fully decoded FILE record. Holds no reference to the bytes it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MftRecord {
    pub header : RecordHeader,

    attributes : BTreeMap<AttributeType, Vec<Attribute>>,
    errors : Vec<AttributeFailure>,
    skipped_type_codes : Vec<u32>,
}

impl MftRecord {
    /// Decodes the header and every attribute we understand.
    ///
    /// Structural damage (signature, header length, attribute list) rejects the record outright.
    /// An attribute that fails on its own is recorded in `errors()` and the walk carries on.
    pub fn decode(record : &[u8]) -> Result<Self, RecordError> {
        let header = RecordHeader::parse(record)?;

        let mut mft_record = MftRecord {
            header,
            attributes: BTreeMap::new(),
            errors: Vec::new(),
            skipped_type_codes: Vec::new(),
        };

        for attribute in header.attributes(record) {
            let attribute = attribute?;

            match decode_attribute(&attribute) {
                Some(Ok(decoded)) => {
                    mft_record.attributes.entry(decoded.get_attribute_type()).or_default().push(decoded);
                },
                Some(Err(error)) => {
                    warn!("Record {}: attribute {:#x} at offset {:#x} failed to decode: {}", header.record_number, attribute.type_code, attribute.offset, error);
                    mft_record.errors.push(AttributeFailure { offset: attribute.offset, type_code: attribute.type_code, error });
                },
                None => {
                    debug!("Record {}: skipping attribute {:#x} ({})", header.record_number, attribute.type_code,
                        attribute.get_attribute_type().map(|t| t.name()).unwrap_or("UNKNOWN"));
                    mft_record.skipped_type_codes.push(attribute.type_code);
                }
            }
        }

        Ok(mft_record)
    }

    pub fn get_attributes(&self) -> &BTreeMap<AttributeType, Vec<Attribute>> {
        &self.attributes
    }

    pub fn attributes_of(&self, attr_type : AttributeType) -> &[Attribute] {
        self.attributes.get(&attr_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_attribute_count(&self) -> usize {
        self.attributes.values().map(Vec::len).sum()
    }

    pub fn standard_information(&self) -> Option<&StandardInformationAttribute> {
        self.attributes_of(AttributeType::StandardInformation).iter().find_map(|a| match a {
            Attribute::StandardInformation(si) => Some(si),
        })
    }

    pub fn errors(&self) -> &[AttributeFailure] {
        &self.errors
    }

    pub fn skipped_type_codes(&self) -> &[u32] {
        &self.skipped_type_codes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().flatten()
    }
}

/// A caller supplied buffer holding consecutive fixed-size records, e.g. a slab read out of $MFT
pub struct MftRecordsChunk<'a> {
    first_record_number : u64,
    record_size : usize,
    buffer : &'a [u8]
}

impl<'a> MftRecordsChunk<'a> {
    pub fn new(buffer : &'a [u8], first_record_number : u64, record_size : usize) -> Self {
        MftRecordsChunk { first_record_number, record_size, buffer }
    }

    pub fn with_default_record_size(buffer : &'a [u8], first_record_number : u64) -> Self {
        Self::new(buffer, first_record_number, MFT_RECORD_SIZE)
    }

    pub fn get_buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Number of slots, a trailing partial slot counts
    pub fn get_record_count(&self) -> usize {
        if self.record_size == 0 {
            0
        } else {
            (self.buffer.len() + self.record_size - 1) / self.record_size
        }
    }

    /// One past the last slot's record number, `None` if that doesn't fit in a u64
    pub fn get_max_record_number(&self) -> Option<u64> {
        self.first_record_number.checked_add(self.get_record_count() as u64)
    }

    pub fn iter(&self) -> MftRecordsChunkIterator<'a> {
        MftRecordsChunkIterator {
            remaining: self.buffer,
            record_size: self.record_size,
            current_record_number: Some(self.first_record_number)
        }
    }
}

impl<'a> IntoIterator for &MftRecordsChunk<'a> {
    type Item = (u64, Result<MftRecord, RecordError>);
    type IntoIter = MftRecordsChunkIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Yields every slot in the chunk, a bad slot doesn't stop the ones after it
pub struct MftRecordsChunkIterator<'a> {
    remaining : &'a [u8],
    record_size : usize,
    // None once the numbering has run past u64::MAX, nothing after that can be named
    current_record_number : Option<u64>
}

impl<'a> Iterator for MftRecordsChunkIterator<'a> {
    type Item = (u64, Result<MftRecord, RecordError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() || self.record_size == 0 {
            return None;
        }

        let record_number = self.current_record_number?;
        self.current_record_number = record_number.checked_add(1);

        let (record, remainder) = self.remaining.split_at(self.record_size.min(self.remaining.len()));
        self.remaining = remainder;

        let result = MftRecord::decode(record);

        if let Ok(decoded) = &result {
            if u64::from(decoded.header.record_number) != record_number {
                warn!("Record {}: header claims to be record {}", record_number, decoded.header.record_number);
            }
        }

        Some((record_number, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Header with the attribute list at 0x38, then whatever attributes are passed in
    fn record_with(flags : u8, record_number : u32, attributes : &[&[u8]], end_marker : bool) -> Vec<u8> {
        let mut record = vec![0u8; 0x38];
        record[0..4].copy_from_slice(b"FILE");
        record[0x10..0x12].copy_from_slice(&1u16.to_le_bytes());
        record[0x12..0x14].copy_from_slice(&1u16.to_le_bytes());
        record[0x14..0x16].copy_from_slice(&0x38u16.to_le_bytes());
        record[0x16] = flags;
        record[0x2C..0x30].copy_from_slice(&record_number.to_le_bytes());
        for attribute in attributes {
            record.extend_from_slice(attribute);
        }
        if end_marker {
            record.extend_from_slice(&ATTR_END_MARKER.to_le_bytes());
            record.extend_from_slice(&[0u8; 4]);
        }
        record
    }

    fn attribute(type_code : u32, length : usize, form_code : u8) -> Vec<u8> {
        let mut attr = vec![0u8; length];
        attr[0..4].copy_from_slice(&type_code.to_le_bytes());
        attr[4..8].copy_from_slice(&(length as u32).to_le_bytes());
        if length > 8 {
            attr[8] = form_code;
        }
        attr
    }

    #[test]
    fn header_fields() {
        let record = record_with(0x03, 42, &[], true);
        let header = RecordHeader::parse(&record).unwrap();

        assert_eq!(header.record_number, 42);
        assert_eq!(header.attributes_offset, 0x38);
        assert_eq!(header.flags, RecordHeaderFlags { deleted: false, directory: true });
        assert_eq!(header.sequence_number, 1);
        assert_eq!(header.hard_link_count, 1);
        assert!(header.is_base_record());
    }

    #[test]
    fn fixup_is_checked_not_applied() {
        let mut record = record_with(0x01, 0, &[], true);
        record.resize(MFT_RECORD_SIZE, 0);
        record[0x04..0x06].copy_from_slice(&0x30u16.to_le_bytes());
        record[0x06..0x08].copy_from_slice(&3u16.to_le_bytes());
        record[0x30..0x32].copy_from_slice(&[0xAB, 0xCD]);
        record[510..512].copy_from_slice(&[0xAB, 0xCD]);
        record[1022..1024].copy_from_slice(&[0xAB, 0xCD]);
        assert!(RecordHeader::parse(&record).unwrap().fixup_okay);

        // Torn write, the second sector never made it
        record[1023] = 0;
        assert!(!RecordHeader::parse(&record).unwrap().fixup_okay);
        assert_eq!(record[510..512], [0xAB, 0xCD]);

        // Array claims more strides than the record has
        record[0x06..0x08].copy_from_slice(&4u16.to_le_bytes());
        record[1023] = 0xCD;
        assert!(!RecordHeader::parse(&record).unwrap().fixup_okay);

        // No update sequence at all
        assert!(!RecordHeader::parse(&record_with(0x01, 0, &[], true)).unwrap().fixup_okay);
    }

    #[test]
    fn header_rejects_bad_signature() {
        assert_eq!(RecordHeader::parse(&[]), Err(RecordError::InvalidSignature { found: vec![] }));
        assert_eq!(RecordHeader::parse(b"FIL"), Err(RecordError::InvalidSignature { found: b"FIL".to_vec() }));

        let mut record = record_with(0x01, 0, &[], true);
        record[0] = 0;
        assert!(matches!(RecordHeader::parse(&record), Err(RecordError::InvalidSignature { .. })));

        // An empty slot in $MFT is all zeroes
        assert!(matches!(RecordHeader::parse(&[0u8; 1024]), Err(RecordError::InvalidSignature { .. })));
    }

    #[test]
    fn header_rejects_truncated() {
        let record = record_with(0x01, 0, &[], true);
        for len in 4..FRSH_MIN_LENGTH {
            assert_eq!(RecordHeader::parse(&record[..len]), Err(RecordError::TruncatedHeader { len, required: 0x30 }));
        }
        assert!(RecordHeader::parse(&record[..FRSH_MIN_LENGTH]).is_ok());
    }

    #[test]
    fn header_does_not_check_attribute_offset() {
        let mut record = record_with(0x01, 0, &[], false);
        record[0x14..0x16].copy_from_slice(&0x400u16.to_le_bytes());
        assert!(RecordHeader::parse(&record).is_ok());

        let err = MftRecord::decode(&record).unwrap_err();
        assert_eq!(err, RecordError::MalformedAttributeList { offset: 0x400, reason: MalformedReason::OutOfBounds });
    }

    #[test]
    fn walker_stops_at_end_marker() {
        let si = attribute(ATTR_STANDARD_INFORMATION, 0x60, 0);
        let fname = attribute(ATTR_FILE_NAME, 0x68, 0);
        let record = record_with(0x01, 0, &[&si, &fname], true);

        let walked : Vec<_> = RecordHeader::parse(&record).unwrap().attributes(&record).collect();
        assert_eq!(walked.len(), 2);

        let first = walked[0].as_ref().unwrap();
        assert_eq!((first.type_code, first.length, first.offset), (0x10, 0x60, 0x38));
        assert_eq!(first.get_slice().len(), 0x60);
        assert_eq!(first.get_residency(), Some(ResidencyFlag { resident: true }));
        // Built without a value offset/length, so the value is empty
        assert_eq!(first.get_content_slice(), Some(&[0u8; 0][..]));

        let second = walked[1].as_ref().unwrap();
        assert_eq!((second.type_code, second.offset), (0x30, 0x98));
    }

    #[test]
    fn walker_restarts_from_same_inputs() {
        let si = attribute(ATTR_STANDARD_INFORMATION, 0x60, 0);
        let record = record_with(0x01, 0, &[&si], true);

        let first : Vec<_> = AttributeWalker::new(&record, 0x38).collect();
        let second : Vec<_> = AttributeWalker::new(&record, 0x38).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn walker_missing_end_marker() {
        let si = attribute(ATTR_STANDARD_INFORMATION, 0x60, 0);
        let record = record_with(0x01, 0, &[&si], false);

        let mut walker = AttributeWalker::new(&record, 0x38);
        assert!(walker.next().unwrap().is_ok());
        assert_eq!(walker.next(), Some(Err(RecordError::MalformedAttributeList { offset: 0x98, reason: MalformedReason::OutOfBounds })));
        assert_eq!(walker.next(), None);
    }

    #[test]
    fn walker_zero_length() {
        let mut record = record_with(0x01, 0, &[&attribute(ATTR_DATA, 0x20, 0)], true);
        record[0x3C..0x40].copy_from_slice(&0u32.to_le_bytes());

        let walked : Vec<_> = AttributeWalker::new(&record, 0x38).collect();
        assert_eq!(walked, vec![Err(RecordError::MalformedAttributeList { offset: 0x38, reason: MalformedReason::ZeroLength })]);
    }

    #[test]
    fn walker_length_too_small() {
        let mut record = record_with(0x01, 0, &[&attribute(ATTR_DATA, 0x20, 0)], true);
        record[0x3C..0x40].copy_from_slice(&4u32.to_le_bytes());

        let walked : Vec<_> = AttributeWalker::new(&record, 0x38).collect();
        assert_eq!(walked, vec![Err(RecordError::MalformedAttributeList { offset: 0x38, reason: MalformedReason::LengthTooSmall(4) })]);
    }

    #[test]
    fn walker_length_past_end() {
        let mut record = record_with(0x01, 0, &[&attribute(ATTR_DATA, 0x20, 0)], true);
        record[0x3C..0x40].copy_from_slice(&0x1000u32.to_le_bytes());
        let available = record.len() - 0x38;

        let walked : Vec<_> = AttributeWalker::new(&record, 0x38).collect();
        assert_eq!(walked, vec![Err(RecordError::MalformedAttributeList {
            offset: 0x38,
            reason: MalformedReason::LengthPastEnd { length: 0x1000, available }
        })]);
    }

    #[test]
    fn end_marker_without_length_is_fine() {
        let mut record = record_with(0x01, 0, &[], false);
        record.extend_from_slice(&ATTR_END_MARKER.to_le_bytes());
        assert_eq!(AttributeWalker::new(&record, 0x38).count(), 0);
    }

    #[test]
    fn dispatch_skips_unknown_kinds() {
        let data = attribute(ATTR_DATA, 0x48, 1);
        let weird = attribute(0x1234, 0x10, 0);
        let record = record_with(0x01, 0, &[&data, &weird], true);

        let decoded = MftRecord::decode(&record).unwrap();
        assert_eq!(decoded.get_attribute_count(), 0);
        assert_eq!(decoded.skipped_type_codes(), &[0x80, 0x1234]);
        assert!(decoded.errors().is_empty());
    }

    #[test]
    fn attribute_error_does_not_stop_the_walk() {
        let bad_si = attribute(ATTR_STANDARD_INFORMATION, 0x60, 1);
        let good_si = attribute(ATTR_STANDARD_INFORMATION, 0x60, 0);
        let short_si = attribute(ATTR_STANDARD_INFORMATION, 0x20, 0);
        let record = record_with(0x01, 7, &[&bad_si, &good_si, &short_si], true);

        let decoded = MftRecord::decode(&record).unwrap();
        assert_eq!(decoded.attributes_of(AttributeType::StandardInformation).len(), 1);
        assert!(decoded.standard_information().unwrap().flag_resident);
        assert_eq!(decoded.errors(), &[
            AttributeFailure { offset: 0x38, type_code: 0x10, error: AttributeError::UnexpectedNonResidentStandardInformation },
            AttributeFailure { offset: 0xF8, type_code: 0x10, error: AttributeError::InvalidAttributeLength { type_code: 0x10, len: 0x20, required: 0x30 } },
        ]);
    }

    #[test]
    fn structural_error_rejects_record() {
        let si = attribute(ATTR_STANDARD_INFORMATION, 0x60, 0);
        let record = record_with(0x01, 0, &[&si], false);
        assert!(matches!(MftRecord::decode(&record), Err(RecordError::MalformedAttributeList { .. })));
    }

    #[test]
    fn chunk_keeps_going_past_bad_records() {
        let si = attribute(ATTR_STANDARD_INFORMATION, 0x60, 0);
        let mut buffer = Vec::new();
        for record_number in 0..3u32 {
            let mut record = record_with(0x01, record_number, &[&si], true);
            record.resize(MFT_RECORD_SIZE, 0);
            buffer.extend_from_slice(&record);
        }
        // Trash the middle one
        buffer[MFT_RECORD_SIZE] = 0;

        let chunk = MftRecordsChunk::with_default_record_size(&buffer, 0);
        assert_eq!(chunk.get_record_count(), 3);
        assert_eq!(chunk.get_max_record_number(), Some(3));
        assert_eq!(chunk.get_buffer().len(), 3 * MFT_RECORD_SIZE);

        let results : Vec<_> = chunk.iter().collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 0);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(RecordError::InvalidSignature { .. })));
        assert_eq!(results[2].0, 2);
        assert_eq!(results[2].1.as_ref().unwrap().header.record_number, 2);
    }

    #[test]
    fn chunk_partial_trailing_slot() {
        let record = record_with(0x01, 0, &[], true);
        let mut buffer = record.clone();
        buffer.resize(0x100, 0);
        buffer.extend_from_slice(&record[..0x20]);

        let chunk = MftRecordsChunk::new(&buffer, 10, 0x100);
        let results : Vec<_> = (&chunk).into_iter().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, 11);
        assert_eq!(results[1].1, Err(RecordError::TruncatedHeader { len: 0x20, required: 0x30 }));
    }

    #[test]
    fn chunk_numbering_stops_at_u64_max() {
        let record = record_with(0x01, 0, &[], true);
        let mut buffer = record.clone();
        buffer.resize(0x100, 0);
        buffer.extend_from_slice(&buffer.clone());

        let chunk = MftRecordsChunk::new(&buffer[..0x100], u64::MAX, 0x100);
        assert_eq!(chunk.get_max_record_number(), None);
        let results : Vec<_> = chunk.iter().collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, u64::MAX);
        assert!(results[0].1.is_ok());

        // The second slot has no record number to go with it
        let chunk = MftRecordsChunk::new(&buffer, u64::MAX, 0x100);
        assert_eq!(chunk.iter().count(), 1);

        let chunk = MftRecordsChunk::new(&buffer, u64::MAX - 1, 0x100);
        assert_eq!(chunk.get_max_record_number(), None);
        let numbers : Vec<u64> = chunk.iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![u64::MAX - 1, u64::MAX]);
    }

    #[test]
    fn chunk_zero_record_size_is_empty() {
        let chunk = MftRecordsChunk::new(&[0u8; 16], 0, 0);
        assert_eq!(chunk.get_record_count(), 0);
        assert_eq!(chunk.iter().count(), 0);
    }
}
