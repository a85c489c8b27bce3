
// pub constants
pub const MFT_RECORD_SIZE : usize = 1024;

pub const EXPECTED_SIGNATURE : [u8; 4] = *b"FILE";

// Offsets into the FILE_RECORD_SEGMENT_HEADER structure
// From https://docs.microsoft.com/en-us/windows/win32/devnotes/file-record-segment-header
pub const FRSH_SIGNATURE_OFFSET : usize = 0x00;
pub const FRSH_UPDATE_SEQUENCE_OFFSET_OFFSET : usize = 0x04;
pub const FRSH_UPDATE_SEQUENCE_SIZE_OFFSET : usize = 0x06;
pub const FRSH_SEQUENCE_NUMBER_OFFSET : usize = 0x10;
pub const FRSH_HARD_LINK_COUNT_OFFSET : usize = 0x12;
pub const FRSH_FIRST_ATTRIBUTE_OFFSET : usize = 0x14;
pub const FRSH_FLAGS_OFFSET : usize = 0x16;
pub const FRSH_BASE_RECORD_OFFSET : usize = 0x20;
pub const FRSH_RECORD_NUMBER_OFFSET : usize = 0x2C;

// Everything the header decoder reads lives below this
pub const FRSH_MIN_LENGTH : usize = FRSH_RECORD_NUMBER_OFFSET + 4;

// The last two bytes of every stride are swapped out for the update sequence number on disk
pub const UPDATE_SEQUENCE_STRIDE : usize = 512;

// File record flags
pub const FILE_RECORD_SEGMENT_IN_USE : u8 = 0x01;
pub const FILE_FILE_NAME_INDEX_PRESENT : u8 = 0x02;

// Attribute form code
pub const FORM_CODE_RESIDENT : u8 = 0x0;

// Offsets into the ATTRIBUTE_RECORD_HEADER structure
// From https://docs.microsoft.com/en-us/windows/win32/devnotes/attribute-record-header
pub const ARH_TYPE_CODE_OFFSET : usize = 0x00;
pub const ARH_RECORD_LENGTH_OFFSET : usize = 0x04;
pub const ARH_FORM_CODE_OFFSET : usize = 0x08;
pub const ARH_RES_VALUE_LENGTH_OFFSET : usize = 0x10;
pub const ARH_RES_VALUE_OFFSET_OFFSET : usize = 0x14;
pub const ARH_RES_LENGTH : usize = 0x18; // The offset to the end of a "resident" type header

// Type code and record length, the least an attribute can be and still tell us where the next one is
pub const ARH_MIN_LENGTH : usize = ARH_RECORD_LENGTH_OFFSET + 4;

// From https://docs.microsoft.com/en-us/windows/win32/devnotes/attribute-record-header
pub const ATTR_STANDARD_INFORMATION : u32 = 0x10;
pub const ATTR_ATTRIBUTE_LIST : u32 = 0x20;
pub const ATTR_FILE_NAME : u32 = 0x30;
pub const ATTR_OBJECT_ID : u32 = 0x40;
pub const ATTR_SECURITY_DESCRIPTOR : u32 = 0x50;
pub const ATTR_VOLUME_NAME : u32 = 0x60;
pub const ATTR_VOLUME_INFORMATION : u32 = 0x70;
pub const ATTR_DATA : u32 = 0x80;
pub const ATTR_INDEX_ROOT : u32 = 0x90;
pub const ATTR_INDEX_ALLOCATION : u32 = 0xA0;
pub const ATTR_BITMAP : u32 = 0xB0;
pub const ATTR_REPARSE_POINT : u32 = 0xC0;
pub const ATTR_EA_INFORMATION : u32 = 0xD0;
pub const ATTR_EA : u32 = 0xE0;
pub const ATTR_PROPERTY_SET : u32 = 0xF0;
pub const ATTR_LOGGED_UTILITY_STREAM : u32 = 0x100;

pub const ATTR_END_MARKER : u32 = 0xffffffff;

// $STANDARD_INFORMATION is always resident, its content starts right after the resident header.
// Anything shorter than this can't hold the fixed timestamps.
pub const SI_MIN_LENGTH : usize = 0x30;
