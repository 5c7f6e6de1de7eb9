use std::fmt::Debug;
use std::hash::Hash;

use crate::classnames::ClassName;

/// Storage category of a value. Governs slot size and which typed memory access is used.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    Byte,
    Boolean,
    Short,
    Char,
    Int,
    Float,
    Long,
    Double,
    Reference,
    Array,
    Void,
}

impl PrimitiveKind {
    /// Bytes occupied in memory. `None` for void, which has no storage.
    pub fn size(&self) -> Option<u32> {
        Some(match self {
            PrimitiveKind::Byte | PrimitiveKind::Boolean => 1,
            PrimitiveKind::Short | PrimitiveKind::Char => 2,
            PrimitiveKind::Int | PrimitiveKind::Float => 4,
            PrimitiveKind::Long | PrimitiveKind::Double => 8,
            PrimitiveKind::Reference | PrimitiveKind::Array => 8,
            PrimitiveKind::Void => return None,
        })
    }

    pub fn is_category_2(&self) -> bool {
        matches!(self, PrimitiveKind::Long | PrimitiveKind::Double)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, PrimitiveKind::Reference | PrimitiveKind::Array)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum PType {
    ByteType,
    CharType,
    DoubleType,
    FloatType,
    IntType,
    LongType,
    Ref(ReferenceType),
    ShortType,
    BooleanType,
    VoidType,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ReferenceType {
    Class(ClassName),
    Array(Box<PType>),
}

impl PType {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PType::ByteType => PrimitiveKind::Byte,
            PType::CharType => PrimitiveKind::Char,
            PType::DoubleType => PrimitiveKind::Double,
            PType::FloatType => PrimitiveKind::Float,
            PType::IntType => PrimitiveKind::Int,
            PType::LongType => PrimitiveKind::Long,
            PType::ShortType => PrimitiveKind::Short,
            PType::BooleanType => PrimitiveKind::Boolean,
            PType::VoidType => PrimitiveKind::Void,
            PType::Ref(ReferenceType::Class(_)) => PrimitiveKind::Reference,
            PType::Ref(ReferenceType::Array(_)) => PrimitiveKind::Array,
        }
    }

    pub fn class(name: ClassName) -> Self {
        PType::Ref(ReferenceType::Class(name))
    }

    /// `None` when `elem` is void, which can never be an array element.
    pub fn array(elem: PType) -> Option<Self> {
        if elem == PType::VoidType {
            return None;
        }
        Some(PType::Ref(ReferenceType::Array(Box::new(elem))))
    }

    pub fn unwrap_class_type(&self) -> Option<&ClassName> {
        match self {
            PType::Ref(ReferenceType::Class(c)) => Some(c),
            _ => None,
        }
    }

    pub fn jvm_representation(&self) -> String {
        let mut res = String::new();
        match self {
            PType::ByteType => res.push('B'),
            PType::CharType => res.push('C'),
            PType::DoubleType => res.push('D'),
            PType::FloatType => res.push('F'),
            PType::IntType => res.push('I'),
            PType::LongType => res.push('J'),
            PType::Ref(ref_) => match ref_ {
                ReferenceType::Class(c) => {
                    res.push('L');
                    res.push_str(c.get_referred_name());
                    res.push(';')
                }
                ReferenceType::Array(subtype) => {
                    res.push('[');
                    res.push_str(&subtype.jvm_representation())
                }
            },
            PType::ShortType => res.push('S'),
            PType::BooleanType => res.push('Z'),
            PType::VoidType => res.push('V'),
        }
        res
    }
}
