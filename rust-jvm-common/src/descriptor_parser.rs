use itertools::Itertools;
use thiserror::Error;

use crate::classnames::ClassName;
use crate::ptype::PType;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum DescriptorError {
    #[error("unexpected end of descriptor {0:?}")]
    UnexpectedEnd(String),
    #[error("unexpected character {found:?} in descriptor {descriptor:?}")]
    UnexpectedCharacter { found: char, descriptor: String },
    #[error("array of void in descriptor {0:?}")]
    VoidArray(String),
    #[error("void is not a field type: {0:?}")]
    VoidField(String),
    #[error("trailing characters in descriptor {0:?}")]
    Trailing(String),
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MethodDescriptor {
    pub parameter_types: Vec<PType>,
    pub return_type: PType,
}

impl MethodDescriptor {
    pub fn jvm_representation(&self) -> String {
        format!("({}){}", self.parameter_types.iter().map(|param| param.jvm_representation()).join(""), self.return_type.jvm_representation())
    }

    /// Local variable slots taken by the parameters; long and double take two.
    pub fn parameter_slots(&self) -> usize {
        self.parameter_types.iter().map(|ptype| if ptype.kind().is_category_2() { 2 } else { 1 }).sum()
    }
}

struct DescriptorCursor<'l> {
    whole: &'l str,
    rest: &'l str,
}

impl<'l> DescriptorCursor<'l> {
    fn new(whole: &'l str) -> Self {
        Self { whole, rest: whole }
    }

    fn peek(&self) -> Result<char, DescriptorError> {
        self.rest.chars().next().ok_or_else(|| DescriptorError::UnexpectedEnd(self.whole.to_string()))
    }

    fn eat_one(&mut self) -> Result<char, DescriptorError> {
        let res = self.peek()?;
        self.rest = &self.rest[res.len_utf8()..];
        Ok(res)
    }

    fn expect(&mut self, expected: char) -> Result<(), DescriptorError> {
        let found = self.eat_one()?;
        if found != expected {
            return Err(self.unexpected(found));
        }
        Ok(())
    }

    fn unexpected(&self, found: char) -> DescriptorError {
        DescriptorError::UnexpectedCharacter { found, descriptor: self.whole.to_string() }
    }

    fn finish(&self) -> Result<(), DescriptorError> {
        if !self.rest.is_empty() {
            return Err(DescriptorError::Trailing(self.whole.to_string()));
        }
        Ok(())
    }

    fn parse_type(&mut self) -> Result<PType, DescriptorError> {
        let first = self.eat_one()?;
        Ok(match first {
            'B' => PType::ByteType,
            'C' => PType::CharType,
            'D' => PType::DoubleType,
            'F' => PType::FloatType,
            'I' => PType::IntType,
            'J' => PType::LongType,
            'S' => PType::ShortType,
            'Z' => PType::BooleanType,
            'V' => PType::VoidType,
            'L' => {
                let end = self.rest.find(';').ok_or_else(|| DescriptorError::UnexpectedEnd(self.whole.to_string()))?;
                let class_name = &self.rest[..end];
                if class_name.is_empty() {
                    return Err(self.unexpected(';'));
                }
                self.rest = &self.rest[end + 1..];
                PType::class(ClassName::new(class_name))
            }
            '[' => {
                let elem = self.parse_type()?;
                PType::array(elem).ok_or_else(|| DescriptorError::VoidArray(self.whole.to_string()))?
            }
            other => return Err(self.unexpected(other)),
        })
    }
}

/// Parses any single type, including `V`.
pub fn parse_type_descriptor(desc: &str) -> Result<PType, DescriptorError> {
    let mut cursor = DescriptorCursor::new(desc);
    let res = cursor.parse_type()?;
    cursor.finish()?;
    Ok(res)
}

pub fn parse_field_descriptor(desc: &str) -> Result<PType, DescriptorError> {
    let res = parse_type_descriptor(desc)?;
    if res == PType::VoidType {
        return Err(DescriptorError::VoidField(desc.to_string()));
    }
    Ok(res)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor, DescriptorError> {
    let mut cursor = DescriptorCursor::new(desc);
    cursor.expect('(')?;
    let mut parameter_types = vec![];
    while cursor.peek()? != ')' {
        let parameter = cursor.parse_type()?;
        if parameter == PType::VoidType {
            return Err(DescriptorError::VoidField(desc.to_string()));
        }
        parameter_types.push(parameter);
    }
    cursor.expect(')')?;
    let return_type = cursor.parse_type()?;
    cursor.finish()?;
    Ok(MethodDescriptor { parameter_types, return_type })
}
