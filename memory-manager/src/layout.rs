use static_assertions::const_assert_eq;

use rust_jvm_common::java_values::ObjectAddress;
use rust_jvm_common::ptype::PrimitiveKind;

use crate::MemoryError;

pub const MARK_WORD_SIZE: u64 = 4;
pub const CLASS_ID_WORD_SIZE: u64 = 4;
pub const OBJECT_HEADER_SIZE: u64 = MARK_WORD_SIZE + CLASS_ID_WORD_SIZE;
pub const ARRAY_LENGTH_WORD_SIZE: u64 = 4;
pub const ARRAY_HEADER_SIZE: u64 = OBJECT_HEADER_SIZE + ARRAY_LENGTH_WORD_SIZE;

const_assert_eq!(OBJECT_HEADER_SIZE, 8);
const_assert_eq!(ARRAY_HEADER_SIZE, 12);

pub struct ObjectMemoryLayout;

impl ObjectMemoryLayout {
    pub const fn mark_word_offset() -> u64 {
        0
    }

    pub const fn class_id_offset() -> u64 {
        MARK_WORD_SIZE
    }

    pub const fn payload_offset() -> u64 {
        OBJECT_HEADER_SIZE
    }

    pub fn field_address(object: ObjectAddress, field_offset: u32) -> u64 {
        object.offset(Self::payload_offset() + field_offset as u64)
    }

    pub fn object_size(payload_size: u32) -> u64 {
        OBJECT_HEADER_SIZE + payload_size as u64
    }
}

pub struct ArrayMemoryLayout {
    elem_kind: PrimitiveKind,
    elem_size: u32,
}

impl ArrayMemoryLayout {
    pub fn from_kind(elem_kind: PrimitiveKind) -> Result<Self, MemoryError> {
        let elem_size = elem_kind.size().ok_or(MemoryError::VoidAccess)?;
        Ok(Self { elem_kind, elem_size })
    }

    pub fn elem_kind(&self) -> PrimitiveKind {
        self.elem_kind
    }

    pub fn elem_size(&self) -> u32 {
        self.elem_size
    }

    pub const fn len_entry_offset() -> u64 {
        OBJECT_HEADER_SIZE
    }

    pub const fn elem_0_entry_offset() -> u64 {
        ARRAY_HEADER_SIZE
    }

    /// No bounds check. A negative index wraps to an address the heap rejects.
    pub fn calculate_index_address(&self, array: ObjectAddress, index: i32) -> u64 {
        let relative = index as i64 * self.elem_size as i64;
        array.offset(Self::elem_0_entry_offset()).wrapping_add(relative as u64)
    }

    pub fn calculate_len_address(&self, array: ObjectAddress) -> u64 {
        array.offset(Self::len_entry_offset())
    }

    pub fn array_size(&self, len: u32) -> u64 {
        ARRAY_HEADER_SIZE + len as u64 * self.elem_size as u64
    }
}
