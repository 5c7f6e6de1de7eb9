use log::trace;
use thiserror::Error;

use rust_jvm_common::ClassID;
use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use rust_jvm_common::ptype::PrimitiveKind;

use crate::accessor::Accessor;
use crate::heap::Heap;
use crate::layout::{ArrayMemoryLayout, ObjectMemoryLayout};

pub mod accessor;
pub mod heap;
pub mod layout;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MemoryError {
    #[error("out of memory: requested {requested} bytes, {available} available")]
    OutOfMemory { requested: u64, available: u64 },
    #[error("access of {size} bytes at {address:#x} is outside the heap")]
    OutOfBounds { address: u64, size: usize },
    #[error("void has no storage")]
    VoidAccess,
    #[error("cannot store {found:?} in a {expected:?} slot")]
    KindMismatch { expected: PrimitiveKind, found: PrimitiveKind },
    #[error("negative array size {0}")]
    NegativeArraySize(i32),
}

const OBJECT_MARK: u32 = 0;
/// Reference arrays carry their element class id, so the mark word is what tells arrays apart.
const ARRAY_MARK: u32 = 1;

/// All raw address arithmetic lives behind this type.
pub struct MemoryManager {
    heap: Heap,
}

impl MemoryManager {
    pub fn new(heap_size: u64) -> Self {
        Self { heap: Heap::new(heap_size) }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    fn allocate_with_header(&mut self, size: u64, class_id: ClassID, mark: u32) -> Result<ObjectAddress, MemoryError> {
        let raw = self.heap.allocate(size)?;
        let address = ObjectAddress::new(raw).ok_or(MemoryError::OutOfBounds { address: raw, size: size as usize })?;
        self.heap.write(address.offset(ObjectMemoryLayout::mark_word_offset()), mark.to_ne_bytes())?;
        self.heap.write(address.offset(ObjectMemoryLayout::class_id_offset()), class_id.0.to_ne_bytes())?;
        Ok(address)
    }

    /// Allocates header plus `payload_size` bytes and zeroes each `(offset, kind)` slot.
    /// Also used for per-class static blocks.
    pub fn allocate_object(&mut self, class_id: ClassID, payload_size: u32, fields: impl IntoIterator<Item=(u32, PrimitiveKind)>) -> Result<ObjectAddress, MemoryError> {
        let address = self.allocate_with_header(ObjectMemoryLayout::object_size(payload_size), class_id, OBJECT_MARK)?;
        for (offset, kind) in fields {
            self.heap.init_with_kind(ObjectMemoryLayout::field_address(address, offset), kind)?;
        }
        trace!("allocated object of class {} at {}", class_id, address);
        Ok(address)
    }

    pub fn allocate_array(&mut self, elem_kind: PrimitiveKind, class_id: ClassID, len: i32) -> Result<ObjectAddress, MemoryError> {
        let unsigned_len = u32::try_from(len).map_err(|_| MemoryError::NegativeArraySize(len))?;
        let layout = ArrayMemoryLayout::from_kind(elem_kind)?;
        let address = self.allocate_with_header(layout.array_size(unsigned_len), class_id, ARRAY_MARK)?;
        self.heap.write(layout.calculate_len_address(address), len.to_ne_bytes())?;
        for index in 0..len {
            self.heap.init_with_kind(layout.calculate_index_address(address, index), elem_kind)?;
        }
        trace!("allocated {:?}[{}] at {}", elem_kind, len, address);
        Ok(address)
    }

    pub fn class_id(&self, object: ObjectAddress) -> Result<ClassID, MemoryError> {
        Ok(ClassID(u32::from_ne_bytes(self.heap.read(object.offset(ObjectMemoryLayout::class_id_offset()))?)))
    }

    pub fn is_array(&self, object: ObjectAddress) -> Result<bool, MemoryError> {
        Ok(u32::from_ne_bytes(self.heap.read(object.offset(ObjectMemoryLayout::mark_word_offset()))?) == ARRAY_MARK)
    }

    pub fn read_field(&self, object: ObjectAddress, offset: u32, kind: PrimitiveKind) -> Result<JavaValue, MemoryError> {
        self.heap.read_with_kind(ObjectMemoryLayout::field_address(object, offset), kind)
    }

    pub fn write_field(&mut self, object: ObjectAddress, offset: u32, kind: PrimitiveKind, value: JavaValue) -> Result<(), MemoryError> {
        self.heap.write_with_kind(ObjectMemoryLayout::field_address(object, offset), kind, value)
    }

    pub fn array_length(&self, array: ObjectAddress) -> Result<i32, MemoryError> {
        Ok(i32::from_ne_bytes(self.heap.read(array.offset(ArrayMemoryLayout::len_entry_offset()))?))
    }

    /// No bounds check against the stored length.
    pub fn read_array_element(&self, array: ObjectAddress, index: i32, elem_kind: PrimitiveKind) -> Result<JavaValue, MemoryError> {
        let layout = ArrayMemoryLayout::from_kind(elem_kind)?;
        self.heap.read_with_kind(layout.calculate_index_address(array, index), elem_kind)
    }

    /// No bounds check against the stored length.
    pub fn write_array_element(&mut self, array: ObjectAddress, index: i32, elem_kind: PrimitiveKind, value: JavaValue) -> Result<(), MemoryError> {
        let layout = ArrayMemoryLayout::from_kind(elem_kind)?;
        self.heap.write_with_kind(layout.calculate_index_address(array, index), elem_kind, value)
    }
}
