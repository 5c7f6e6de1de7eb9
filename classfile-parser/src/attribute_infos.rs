use rust_jvm_common::classfile::{Code, ConstantPool, ExceptionTableElem};
use rust_jvm_common::loading::ClassfileReadError;

use crate::code::parse_code_raw;
use crate::parsing_util::ParsingContext;

pub const CODE_ATTRIBUTE_NAME: &str = "Code";
pub const CONSTANT_VALUE_ATTRIBUTE_NAME: &str = "ConstantValue";

/// The attributes this reader understands. Everything else is skipped by length.
#[derive(Debug)]
pub enum AttributeType {
    Code(Code),
    ConstantValue(u16),
    Unknown,
}

fn parse_code(p: &mut dyn ParsingContext) -> Result<Code, ClassfileReadError> {
    let max_stack = p.read16()?;
    let max_locals = p.read16()?;
    let code_length = p.read32()? as usize;
    let raw = p.read_bytes(code_length)?;
    let decoded = parse_code_raw(raw.as_slice())?;
    let exception_table_length = p.read16()?;
    let mut exception_table = Vec::with_capacity(exception_table_length as usize);
    for _ in 0..exception_table_length {
        let start_pc = decoded.index_of(p.read16()? as usize, code_length)?;
        let end_pc = decoded.index_of(p.read16()? as usize, code_length)?;
        let handler_pc = decoded.index_of(p.read16()? as usize, code_length)?;
        let catch_type = match p.read16()? {
            0 => None,
            catch_type => Some(catch_type),
        };
        exception_table.push(ExceptionTableElem { start_pc, end_pc, handler_pc, catch_type });
    }
    let attributes_count = p.read16()?;
    for _ in 0..attributes_count {
        skip_attribute(p)?;
    }
    Ok(Code { max_stack, max_locals, instructions: decoded.instructions, exception_table })
}

fn skip_attribute(p: &mut dyn ParsingContext) -> Result<(), ClassfileReadError> {
    let _attribute_name_index = p.read16()?;
    let attribute_length = p.read32()?;
    p.read_bytes(attribute_length as usize)?;
    Ok(())
}

pub fn parse_attribute(p: &mut dyn ParsingContext, constant_pool: &ConstantPool) -> Result<AttributeType, ClassfileReadError> {
    let attribute_name_index = p.read16()?;
    let attribute_length = p.read32()?;
    let name = constant_pool.utf8(attribute_name_index)?;
    Ok(match name {
        CODE_ATTRIBUTE_NAME => AttributeType::Code(parse_code(p)?),
        CONSTANT_VALUE_ATTRIBUTE_NAME => AttributeType::ConstantValue(p.read16()?),
        _ => {
            p.read_bytes(attribute_length as usize)?;
            AttributeType::Unknown
        }
    })
}

pub fn parse_attributes(p: &mut dyn ParsingContext, constant_pool: &ConstantPool) -> Result<Vec<AttributeType>, ClassfileReadError> {
    let attributes_count = p.read16()?;
    let mut res = Vec::with_capacity(attributes_count as usize);
    for _ in 0..attributes_count {
        res.push(parse_attribute(p, constant_pool)?);
    }
    Ok(res)
}
