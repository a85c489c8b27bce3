use chrono::NaiveDateTime;
use log::debug;

use crate::common::*;
use crate::error::{AttributeError, FieldOutOfRange, TimestampError};
use crate::filetime::RawFiletime;
use crate::slice_utils::*;

/// The two predicates we care about from the FILE record flags
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordHeaderFlags {
    pub deleted : bool,
    pub directory : bool,
}

impl RecordHeaderFlags {
    /// Every byte is valid: deleted is just the in-use bit being clear, directory is independent of it
    pub fn parse(flags : u8) -> Self {
        RecordHeaderFlags {
            deleted: flags & FILE_RECORD_SEGMENT_IN_USE == 0,
            directory: flags & FILE_FILE_NAME_INDEX_PRESENT != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidencyFlag {
    pub resident : bool,
}

impl ResidencyFlag {
    pub fn parse(form_code : u8) -> Self {
        ResidencyFlag { resident: form_code == FORM_CODE_RESIDENT }
    }
}

/// The attribute kinds NTFS defines. Only some of them get decoded, the rest are skipped by type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeType {
    StandardInformation,
    AttributeList,
    FileName,
    ObjectId,
    SecurityDescriptor,
    VolumeName,
    VolumeInformation,
    Data,
    IndexRoot,
    IndexAllocation,
    Bitmap,
    ReparsePoint,
    EaInformation,
    Ea,
    PropertySet,
    LoggedUtilityStream,
}

impl AttributeType {
    pub fn from_type_code(type_code : u32) -> Option<Self> {
        let attr_type = match type_code {
            ATTR_STANDARD_INFORMATION => AttributeType::StandardInformation,
            ATTR_ATTRIBUTE_LIST => AttributeType::AttributeList,
            ATTR_FILE_NAME => AttributeType::FileName,
            ATTR_OBJECT_ID => AttributeType::ObjectId,
            ATTR_SECURITY_DESCRIPTOR => AttributeType::SecurityDescriptor,
            ATTR_VOLUME_NAME => AttributeType::VolumeName,
            ATTR_VOLUME_INFORMATION => AttributeType::VolumeInformation,
            ATTR_DATA => AttributeType::Data,
            ATTR_INDEX_ROOT => AttributeType::IndexRoot,
            ATTR_INDEX_ALLOCATION => AttributeType::IndexAllocation,
            ATTR_BITMAP => AttributeType::Bitmap,
            ATTR_REPARSE_POINT => AttributeType::ReparsePoint,
            ATTR_EA_INFORMATION => AttributeType::EaInformation,
            ATTR_EA => AttributeType::Ea,
            ATTR_PROPERTY_SET => AttributeType::PropertySet,
            ATTR_LOGGED_UTILITY_STREAM => AttributeType::LoggedUtilityStream,
            _ => return None
        };
        Some(attr_type)
    }

    pub fn type_code(&self) -> u32 {
        match self {
            AttributeType::StandardInformation => ATTR_STANDARD_INFORMATION,
            AttributeType::AttributeList => ATTR_ATTRIBUTE_LIST,
            AttributeType::FileName => ATTR_FILE_NAME,
            AttributeType::ObjectId => ATTR_OBJECT_ID,
            AttributeType::SecurityDescriptor => ATTR_SECURITY_DESCRIPTOR,
            AttributeType::VolumeName => ATTR_VOLUME_NAME,
            AttributeType::VolumeInformation => ATTR_VOLUME_INFORMATION,
            AttributeType::Data => ATTR_DATA,
            AttributeType::IndexRoot => ATTR_INDEX_ROOT,
            AttributeType::IndexAllocation => ATTR_INDEX_ALLOCATION,
            AttributeType::Bitmap => ATTR_BITMAP,
            AttributeType::ReparsePoint => ATTR_REPARSE_POINT,
            AttributeType::EaInformation => ATTR_EA_INFORMATION,
            AttributeType::Ea => ATTR_EA,
            AttributeType::PropertySet => ATTR_PROPERTY_SET,
            AttributeType::LoggedUtilityStream => ATTR_LOGGED_UTILITY_STREAM,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::StandardInformation => "$STANDARD_INFORMATION",
            AttributeType::AttributeList => "$ATTRIBUTE_LIST",
            AttributeType::FileName => "$FILE_NAME",
            AttributeType::ObjectId => "$OBJECT_ID",
            AttributeType::SecurityDescriptor => "$SECURITY_DESCRIPTOR",
            AttributeType::VolumeName => "$VOLUME_NAME",
            AttributeType::VolumeInformation => "$VOLUME_INFORMATION",
            AttributeType::Data => "$DATA",
            AttributeType::IndexRoot => "$INDEX_ROOT",
            AttributeType::IndexAllocation => "$INDEX_ALLOCATION",
            AttributeType::Bitmap => "$BITMAP",
            AttributeType::ReparsePoint => "$REPARSE_POINT",
            AttributeType::EaInformation => "$EA_INFORMATION",
            AttributeType::Ea => "$EA",
            AttributeType::PropertySet => "$PROPERTY_SET",
            AttributeType::LoggedUtilityStream => "$LOGGED_UTILITY_STREAM",
        }
    }
}

/// One attribute's slice out of the record, as handed out by the attribute walker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeHeader<'a> {
    pub type_code : u32,
    pub length : u32,
    /// Offset of the attribute from the start of the record
    pub offset : usize,
    slice_data : &'a [u8],
}

impl<'a> AttributeHeader<'a> {
    pub(crate) const ARH_TYPE_CODE : MftDataField<u32> = MftDataField::new("TypeCode", ARH_TYPE_CODE_OFFSET);
    pub(crate) const ARH_RECORD_LENGTH : MftDataField<u32> = MftDataField::new("RecordLength", ARH_RECORD_LENGTH_OFFSET);
    const ARH_FORM_CODE : MftDataField<u8> = MftDataField::new("FormCode", ARH_FORM_CODE_OFFSET);
    const ARH_RES_VALUE_LENGTH : MftDataField<u32> = MftDataField::new("ValueLength", ARH_RES_VALUE_LENGTH_OFFSET);
    const ARH_RES_VALUE_OFFSET : MftDataField<u16> = MftDataField::new("ValueOffset", ARH_RES_VALUE_OFFSET_OFFSET);

    /// `slice_data` must already be cut down to the attribute's declared length
    pub(crate) fn new(slice_data : &'a [u8], offset : usize) -> Result<Self, FieldOutOfRange> {
        Ok(AttributeHeader {
            type_code: Self::ARH_TYPE_CODE.read(slice_data)?,
            length: Self::ARH_RECORD_LENGTH.read(slice_data)?,
            offset,
            slice_data,
        })
    }

    pub fn get_attribute_type(&self) -> Option<AttributeType> {
        AttributeType::from_type_code(self.type_code)
    }

    /// `None` when the attribute is too short to even carry a form code
    pub fn get_residency(&self) -> Option<ResidencyFlag> {
        Self::ARH_FORM_CODE.read_optional(self.slice_data).map(ResidencyFlag::parse)
    }

    /// Offset of the value from the start of the attribute, only meaningful for resident attributes
    pub fn get_content_offset(&self) -> Option<u16> {
        match self.get_residency()? {
            ResidencyFlag { resident: true } => Self::ARH_RES_VALUE_OFFSET.read_optional(self.slice_data),
            _ => None
        }
    }

    pub fn get_content_length(&self) -> Option<u32> {
        match self.get_residency()? {
            ResidencyFlag { resident: true } => Self::ARH_RES_VALUE_LENGTH.read_optional(self.slice_data),
            _ => None
        }
    }

    /// The resident value, `None` for non-resident attributes or when the declared value doesn't
    /// fit inside the attribute
    pub fn get_content_slice(&self) -> Option<&'a [u8]> {
        let start = self.get_content_offset()? as usize;
        let end = start.checked_add(self.get_content_length()? as usize)?;
        self.slice_data.get(start..end)
    }

    /// The whole attribute including its header
    pub fn get_slice(&self) -> &'a [u8] {
        self.slice_data
    }
}

/// Timestamps and friends from a $STANDARD_INFORMATION attribute.
///
/// A timestamp that fails to parse is left as `None` rather than failing the attribute, damaged
/// metadata often has garbage timestamps next to perfectly good structure. The NTFS 3.0 fields are
/// `None` when the attribute is too short to hold them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardInformationAttribute {
    pub created : Option<NaiveDateTime>,
    pub modified : Option<NaiveDateTime>,
    pub changed : Option<NaiveDateTime>,
    pub accessed : Option<NaiveDateTime>,
    pub flag_resident : bool,

    pub permissions : Option<u32>,
    pub owner_id : Option<u32>,
    pub security_id : Option<u32>,
    pub usn : Option<u64>,
}

impl StandardInformationAttribute {
    // == STANDARD_INFORMATION offsets, relative to the start of the attribute (resident header included)
    const SI_FORM_CODE : MftDataField<u8> = MftDataField::new("FormCode", ARH_FORM_CODE_OFFSET);
    const SI_CREATE_TIMESTAMP : MftDataField<RawFiletime> = MftDataField::new("CreatedTimestamp", ARH_RES_LENGTH);
    const SI_ALTERED_TIMESTAMP : MftDataField<RawFiletime> = MftDataField::new("AlteredTimestamp", ARH_RES_LENGTH + 0x08);
    const SI_MFT_CHANGED_TIMESTAMP : MftDataField<RawFiletime> = MftDataField::new("ChangedTimestamp", ARH_RES_LENGTH + 0x10);
    const SI_READ_TIMESTAMP : MftDataField<RawFiletime> = MftDataField::new("ReadTimestamp", ARH_RES_LENGTH + 0x18);
    const SI_PERMISSIONS : MftDataField<u32> = MftDataField::new("Permissions", ARH_RES_LENGTH + 0x20);
    const SI_OWNER_ID : MftDataField<u32> = MftDataField::new("OwnerId", ARH_RES_LENGTH + 0x30);
    const SI_SECURITY_ID : MftDataField<u32> = MftDataField::new("SecurityId", ARH_RES_LENGTH + 0x34);
    const SI_USN : MftDataField<u64> = MftDataField::new("Usn", ARH_RES_LENGTH + 0x40);

    pub fn parse(attribute : &[u8]) -> Result<Self, AttributeError> {
        if attribute.len() < SI_MIN_LENGTH {
            return Err(AttributeError::InvalidAttributeLength {
                type_code: ATTR_STANDARD_INFORMATION,
                len: attribute.len(),
                required: SI_MIN_LENGTH
            });
        }

        let form_code = Self::SI_FORM_CODE.read(attribute).map_err(|err| AttributeError::InvalidAttributeLength {
            type_code: ATTR_STANDARD_INFORMATION,
            len: err.len,
            required: err.range.end
        })?;

        // Always resident by definition, so this is corruption rather than something to decode differently
        let residency = ResidencyFlag::parse(form_code);
        if !residency.resident {
            return Err(AttributeError::UnexpectedNonResidentStandardInformation);
        }

        Ok(StandardInformationAttribute {
            created: read_timestamp(&Self::SI_CREATE_TIMESTAMP, attribute),
            modified: read_timestamp(&Self::SI_ALTERED_TIMESTAMP, attribute),
            changed: read_timestamp(&Self::SI_MFT_CHANGED_TIMESTAMP, attribute),
            accessed: read_timestamp(&Self::SI_READ_TIMESTAMP, attribute),
            flag_resident: residency.resident,
            permissions: Self::SI_PERMISSIONS.read_optional(attribute),
            owner_id: Self::SI_OWNER_ID.read_optional(attribute),
            security_id: Self::SI_SECURITY_ID.read_optional(attribute),
            usn: Self::SI_USN.read_optional(attribute),
        })
    }
}

fn read_timestamp(field : &MftDataField<RawFiletime>, attribute : &[u8]) -> Option<NaiveDateTime> {
    // Only the last timestamp can be cut off by a short attribute, treat it like a bad value
    let raw = match field.read(attribute) {
        Ok(raw) => raw,
        Err(err) => {
            debug!("{} left unset: {}", field.get_name(), err);
            return None;
        }
    };

    raw.parse()
        .map_err(|err : TimestampError| debug!("{} left unset: {}", field.get_name(), err))
        .ok()
}

/// The decoded form of every attribute kind we understand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    StandardInformation(StandardInformationAttribute),
}

impl Attribute {
    pub fn get_attribute_type(&self) -> AttributeType {
        match self {
            Attribute::StandardInformation(_) => AttributeType::StandardInformation,
        }
    }
}
