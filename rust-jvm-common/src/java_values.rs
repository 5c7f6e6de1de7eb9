use std::fmt::{Display, Formatter};
use std::num::NonZeroU64;

use crate::ptype::PrimitiveKind;

/// Non-null heap address. Null is `Option::<ObjectAddress>::None`, stored in memory as 0.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ObjectAddress(NonZeroU64);

impl ObjectAddress {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(ObjectAddress)
    }

    pub fn as_u64(&self) -> u64 {
        self.0.get()
    }

    pub fn offset(&self, by: u64) -> u64 {
        self.as_u64() + by
    }
}

impl Display for ObjectAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.as_u64())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum JavaValue {
    Byte(i8),
    Boolean(bool),
    Short(i16),
    Char(u16),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Object(Option<ObjectAddress>),
}

impl JavaValue {
    pub fn null() -> Self {
        JavaValue::Object(None)
    }

    /// Zero value of a kind: 0, false or null. `None` for void.
    pub fn default_value(kind: PrimitiveKind) -> Option<Self> {
        Some(match kind {
            PrimitiveKind::Byte => JavaValue::Byte(0),
            PrimitiveKind::Boolean => JavaValue::Boolean(false),
            PrimitiveKind::Short => JavaValue::Short(0),
            PrimitiveKind::Char => JavaValue::Char(0),
            PrimitiveKind::Int => JavaValue::Int(0),
            PrimitiveKind::Float => JavaValue::Float(0.0),
            PrimitiveKind::Long => JavaValue::Long(0),
            PrimitiveKind::Double => JavaValue::Double(0.0),
            PrimitiveKind::Reference | PrimitiveKind::Array => JavaValue::Object(None),
            PrimitiveKind::Void => return None,
        })
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            JavaValue::Byte(_) => PrimitiveKind::Byte,
            JavaValue::Boolean(_) => PrimitiveKind::Boolean,
            JavaValue::Short(_) => PrimitiveKind::Short,
            JavaValue::Char(_) => PrimitiveKind::Char,
            JavaValue::Int(_) => PrimitiveKind::Int,
            JavaValue::Float(_) => PrimitiveKind::Float,
            JavaValue::Long(_) => PrimitiveKind::Long,
            JavaValue::Double(_) => PrimitiveKind::Double,
            JavaValue::Object(_) => PrimitiveKind::Reference,
        }
    }

    pub fn is_category_2(&self) -> bool {
        self.kind().is_category_2()
    }

    /// Operand stacks never hold values narrower than int.
    pub fn to_stack_value(self) -> Self {
        match self {
            JavaValue::Byte(b) => JavaValue::Int(b as i32),
            JavaValue::Boolean(b) => JavaValue::Int(b as i32),
            JavaValue::Short(s) => JavaValue::Int(s as i32),
            JavaValue::Char(c) => JavaValue::Int(c as i32),
            other => other,
        }
    }

    /// Converts a stack value into the representation stored in a slot of `kind`.
    /// Ints truncate into the narrow kinds. `None` when the value cannot live in such a slot.
    pub fn narrow_to(self, kind: PrimitiveKind) -> Option<Self> {
        Some(match (self.to_stack_value(), kind) {
            (JavaValue::Int(i), PrimitiveKind::Byte) => JavaValue::Byte(i as i8),
            (JavaValue::Int(i), PrimitiveKind::Boolean) => JavaValue::Boolean(i & 1 != 0),
            (JavaValue::Int(i), PrimitiveKind::Short) => JavaValue::Short(i as i16),
            (JavaValue::Int(i), PrimitiveKind::Char) => JavaValue::Char(i as u16),
            (JavaValue::Int(i), PrimitiveKind::Int) => JavaValue::Int(i),
            (JavaValue::Float(f), PrimitiveKind::Float) => JavaValue::Float(f),
            (JavaValue::Long(l), PrimitiveKind::Long) => JavaValue::Long(l),
            (JavaValue::Double(d), PrimitiveKind::Double) => JavaValue::Double(d),
            (JavaValue::Object(o), PrimitiveKind::Reference | PrimitiveKind::Array) => JavaValue::Object(o),
            _ => return None,
        })
    }

    pub fn unwrap_int(&self) -> Option<i32> {
        match self.to_stack_value() {
            JavaValue::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn unwrap_long(&self) -> Option<i64> {
        match self {
            JavaValue::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn unwrap_float(&self) -> Option<f32> {
        match self {
            JavaValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn unwrap_double(&self) -> Option<f64> {
        match self {
            JavaValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn unwrap_object(&self) -> Option<Option<ObjectAddress>> {
        match self {
            JavaValue::Object(o) => Some(*o),
            _ => None,
        }
    }
}

impl Display for JavaValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JavaValue::Byte(b) => write!(f, "byte {}", b),
            JavaValue::Boolean(b) => write!(f, "boolean {}", b),
            JavaValue::Short(s) => write!(f, "short {}", s),
            JavaValue::Char(c) => write!(f, "char {}", c),
            JavaValue::Int(i) => write!(f, "int {}", i),
            JavaValue::Float(fl) => write!(f, "float {}", fl),
            JavaValue::Long(l) => write!(f, "long {}", l),
            JavaValue::Double(d) => write!(f, "double {}", d),
            JavaValue::Object(None) => write!(f, "null"),
            JavaValue::Object(Some(address)) => write!(f, "ref {}", address),
        }
    }
}
