use std::collections::HashMap;

use itertools::Itertools;

use rust_jvm_common::CPIndex;
use rust_jvm_common::classfile::{ACC_ENUM, ACC_FINAL, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC, ACC_SYNTHETIC, ACC_TRANSIENT, ACC_VOLATILE, Classfile};
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::descriptor_parser::{DescriptorError, parse_field_descriptor};
use rust_jvm_common::ptype::{PrimitiveKind, PType};

use crate::LinkError;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct FieldNameAndClass {
    pub field_name: String,
    pub class_name: ClassName,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AccessLevel {
    Public,
    Protected,
    Package,
    Private,
}

#[derive(Debug, Clone)]
pub struct RuntimeField {
    pub name: String,
    pub ptype: PType,
    pub kind: PrimitiveKind,
    pub access_flags: u16,
    /// Relative to the start of the owning partition's payload. Fixed at link time.
    pub offset: u32,
    pub declaring_class: ClassName,
    pub constant_value: Option<CPIndex>,
}

impl RuntimeField {
    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC > 0
    }

    pub fn is_final(&self) -> bool {
        self.access_flags & ACC_FINAL > 0
    }

    pub fn is_volatile(&self) -> bool {
        self.access_flags & ACC_VOLATILE > 0
    }

    pub fn is_transient(&self) -> bool {
        self.access_flags & ACC_TRANSIENT > 0
    }

    pub fn is_synthetic(&self) -> bool {
        self.access_flags & ACC_SYNTHETIC > 0
    }

    pub fn is_enum(&self) -> bool {
        self.access_flags & ACC_ENUM > 0
    }

    pub fn access_level(&self) -> AccessLevel {
        if self.access_flags & ACC_PUBLIC > 0 {
            AccessLevel::Public
        } else if self.access_flags & ACC_PROTECTED > 0 {
            AccessLevel::Protected
        } else if self.access_flags & ACC_PRIVATE > 0 {
            AccessLevel::Private
        } else {
            AccessLevel::Package
        }
    }
}

/// Every field visible in a class, keyed by declaring class and name, plus partition sizes.
#[derive(Debug, Clone, Default)]
pub struct FieldGroup {
    fields: HashMap<FieldNameAndClass, RuntimeField>,
    pub instance_size: u32,
    pub static_size: u32,
}

impl FieldGroup {
    /// Inherited entries keep their offsets. Declared fields are appended in declaration order.
    pub fn new(class_name: &ClassName, classfile: &Classfile, parent: Option<&FieldGroup>) -> Result<Self, LinkError> {
        let mut res = parent.cloned().unwrap_or_default();
        for field_info in classfile.fields.iter() {
            let name = classfile.constant_pool.utf8(field_info.name_index)?.to_string();
            let desc = classfile.constant_pool.utf8(field_info.descriptor_index)?;
            let ptype = parse_field_descriptor(desc)?;
            let kind = ptype.kind();
            let size = kind.size().ok_or_else(|| DescriptorError::VoidField(desc.to_string()))?;
            let counter = if field_info.access_flags & ACC_STATIC > 0 {
                &mut res.static_size
            } else {
                &mut res.instance_size
            };
            let offset = *counter;
            *counter += size;
            let key = FieldNameAndClass { field_name: name.clone(), class_name: class_name.clone() };
            res.fields.insert(key, RuntimeField {
                name,
                ptype,
                kind,
                access_flags: field_info.access_flags,
                offset,
                declaring_class: class_name.clone(),
                constant_value: field_info.constant_value,
            });
        }
        Ok(res)
    }

    pub fn get(&self, class_name: &ClassName, field_name: &str) -> Option<&RuntimeField> {
        self.fields.get(&FieldNameAndClass { field_name: field_name.to_string(), class_name: class_name.clone() })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn instance_fields(&self) -> Vec<&RuntimeField> {
        self.fields.values().filter(|field| !field.is_static()).sorted_by_key(|field| field.offset).collect()
    }

    pub fn static_fields_declared_by(&self, class_name: &ClassName) -> Vec<&RuntimeField> {
        self.fields.values().filter(|field| field.is_static() && &field.declaring_class == class_name).sorted_by_key(|field| field.offset).collect()
    }

    /// `(offset, kind)` of every instance slot, in layout order, for zeroing a fresh object.
    pub fn instance_slots(&self) -> Vec<(u32, PrimitiveKind)> {
        self.instance_fields().into_iter().map(|field| (field.offset, field.kind)).collect()
    }
}
