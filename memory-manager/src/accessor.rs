use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use rust_jvm_common::ptype::PrimitiveKind;

use crate::heap::Heap;
use crate::MemoryError;

/// Typed reads and writes. Each kind maps to a fixed width access; void has none.
pub trait Accessor {
    fn read_with_kind(&self, address: u64, kind: PrimitiveKind) -> Result<JavaValue, MemoryError>;
    fn write_with_kind(&mut self, address: u64, kind: PrimitiveKind, value: JavaValue) -> Result<(), MemoryError>;

    fn init_with_kind(&mut self, address: u64, kind: PrimitiveKind) -> Result<(), MemoryError> {
        let zero = JavaValue::default_value(kind).ok_or(MemoryError::VoidAccess)?;
        self.write_with_kind(address, kind, zero)
    }
}

impl Accessor for Heap {
    fn read_with_kind(&self, address: u64, kind: PrimitiveKind) -> Result<JavaValue, MemoryError> {
        Ok(match kind {
            PrimitiveKind::Byte => JavaValue::Byte(i8::from_ne_bytes(self.read(address)?)),
            PrimitiveKind::Boolean => JavaValue::Boolean(u8::from_ne_bytes(self.read(address)?) != 0),
            PrimitiveKind::Short => JavaValue::Short(i16::from_ne_bytes(self.read(address)?)),
            PrimitiveKind::Char => JavaValue::Char(u16::from_ne_bytes(self.read(address)?)),
            PrimitiveKind::Int => JavaValue::Int(i32::from_ne_bytes(self.read(address)?)),
            PrimitiveKind::Float => JavaValue::Float(f32::from_ne_bytes(self.read(address)?)),
            PrimitiveKind::Long => JavaValue::Long(i64::from_ne_bytes(self.read(address)?)),
            PrimitiveKind::Double => JavaValue::Double(f64::from_ne_bytes(self.read(address)?)),
            PrimitiveKind::Reference | PrimitiveKind::Array => JavaValue::Object(ObjectAddress::new(u64::from_ne_bytes(self.read(address)?))),
            PrimitiveKind::Void => return Err(MemoryError::VoidAccess),
        })
    }

    fn write_with_kind(&mut self, address: u64, kind: PrimitiveKind, value: JavaValue) -> Result<(), MemoryError> {
        match (kind, value) {
            (PrimitiveKind::Byte, JavaValue::Byte(b)) => self.write(address, b.to_ne_bytes()),
            (PrimitiveKind::Boolean, JavaValue::Boolean(b)) => self.write(address, (b as u8).to_ne_bytes()),
            (PrimitiveKind::Short, JavaValue::Short(s)) => self.write(address, s.to_ne_bytes()),
            (PrimitiveKind::Char, JavaValue::Char(c)) => self.write(address, c.to_ne_bytes()),
            (PrimitiveKind::Int, JavaValue::Int(i)) => self.write(address, i.to_ne_bytes()),
            (PrimitiveKind::Float, JavaValue::Float(f)) => self.write(address, f.to_ne_bytes()),
            (PrimitiveKind::Long, JavaValue::Long(l)) => self.write(address, l.to_ne_bytes()),
            (PrimitiveKind::Double, JavaValue::Double(d)) => self.write(address, d.to_ne_bytes()),
            (PrimitiveKind::Reference | PrimitiveKind::Array, JavaValue::Object(o)) => {
                let raw = o.map(|address| address.as_u64()).unwrap_or(0);
                self.write(address, raw.to_ne_bytes())
            }
            (PrimitiveKind::Void, _) => Err(MemoryError::VoidAccess),
            (expected, value) => Err(MemoryError::KindMismatch { expected, found: value.kind() }),
        }
    }
}
