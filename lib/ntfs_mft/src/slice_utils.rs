
use byteorder::*;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ops::Range;

use crate::error::FieldOutOfRange;
use crate::filetime::RawFiletime;

/// A named little-endian field at a fixed offset into a record or attribute
pub struct MftDataField<T : SliceReadable> {
    name : &'static str,
    offset : usize,
    phantom : PhantomData<T>
}

impl<T : SliceReadable> MftDataField<T> {
    pub const fn new(name : &'static str, offset : usize) -> Self {
        MftDataField { name, offset, phantom: PhantomData }
    }

    pub fn read(&self, slice : &[u8]) -> Result<T, FieldOutOfRange> {
        let range = self.get_range();
        match slice.get(range.clone()) {
            Some(field) => Ok(T::read(field)),
            None => Err(FieldOutOfRange { name: self.name, range, len: slice.len() })
        }
    }

    /// Like `read`, but a short slice just means the field isn't there
    pub fn read_optional(&self, slice : &[u8]) -> Option<T> {
        self.read(slice).ok()
    }

    pub const fn get_range(&self) -> Range<usize> {
        self.offset..self.offset + T::SIZE
    }

    pub const fn end(&self) -> usize {
        self.offset + T::SIZE
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }
}

// Slice readable types
// `read` is only ever handed a slice of exactly `SIZE` bytes
pub trait SliceReadable : Sized {
    const SIZE : usize = size_of::<Self>();
    fn read(field : &[u8]) -> Self;
}

impl SliceReadable for u64 {
    fn read(field : &[u8]) -> u64 { LittleEndian::read_u64(field) }
}

impl SliceReadable for u32 {
    fn read(field : &[u8]) -> u32 { LittleEndian::read_u32(field) }
}

impl SliceReadable for u16 {
    fn read(field : &[u8]) -> u16 { LittleEndian::read_u16(field) }
}

impl SliceReadable for u8 {
    fn read(field : &[u8]) -> u8 { field[0] }
}

impl SliceReadable for [u8; 4] {
    fn read(field : &[u8]) -> [u8; 4] {
        let mut out = [0u8; 4];
        out.copy_from_slice(field);
        out
    }
}

// FILETIME
impl SliceReadable for RawFiletime {
    const SIZE : usize = 8;
    fn read(field : &[u8]) -> RawFiletime { RawFiletime(LittleEndian::read_u64(field)) }
}

// Special shenanigans for our u48
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct u48 ( u64 );

impl From<u48> for u64 {
    fn from(value: u48) -> Self {
        value.0
    }
}

impl SliceReadable for u48 {
    const SIZE : usize = 6;
    fn read(field : &[u8]) -> u48 { u48 ( LittleEndian::read_u48(field) ) }
}
