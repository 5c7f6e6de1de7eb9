use rust_jvm_common::classfile::{ConstantKind, MemberRef};
use rust_jvm_common::loading::ClassfileReadError;

use crate::parsing_util::ParsingContext;

const UTF8_CONST_NUM: u8 = 1;
const INTEGER_CONST_NUM: u8 = 3;
const FLOAT_CONST_NUM: u8 = 4;
const LONG_CONST_NUM: u8 = 5;
const DOUBLE_CONST_NUM: u8 = 6;
const CLASS_CONST_NUM: u8 = 7;
const STRING_CONST_NUM: u8 = 8;
const FIELDREF_CONST_NUM: u8 = 9;
const METHODREF_CONST_NUM: u8 = 10;
const INTERFACE_METHODREF_CONST_NUM: u8 = 11;
const NAME_AND_TYPE_CONST_NUM: u8 = 12;
const METHOD_HANDLE_CONST_NUM: u8 = 15;
const METHOD_TYPE_CONST_NUM: u8 = 16;
const DYNAMIC_CONST_NUM: u8 = 17;
const INVOKE_DYNAMIC_CONST_NUM: u8 = 18;
const MODULE_CONST_NUM: u8 = 19;
const PACKAGE_CONST_NUM: u8 = 20;

fn parse_member_ref(p: &mut dyn ParsingContext) -> Result<MemberRef, ClassfileReadError> {
    let class_index = p.read16()?;
    let name_and_type_index = p.read16()?;
    Ok(MemberRef { class_index, name_and_type_index })
}

fn read_long(p: &mut dyn ParsingContext) -> Result<u64, ClassfileReadError> {
    let high_bytes = p.read32()? as u64;
    let low_bytes = p.read32()? as u64;
    Ok((high_bytes << 32) | low_bytes)
}

pub fn parse_constant_info(p: &mut dyn ParsingContext, index: u16) -> Result<ConstantKind, ClassfileReadError> {
    let tag = p.read8()?;
    Ok(match tag {
        UTF8_CONST_NUM => {
            let length = p.read16()?;
            let buffer = p.read_bytes(length as usize)?;
            // modified utf8 only differs for nulls and supplementary characters
            ConstantKind::Utf8(String::from_utf8_lossy(buffer.as_slice()).into_owned())
        }
        INTEGER_CONST_NUM => ConstantKind::Integer(p.read32()? as i32),
        FLOAT_CONST_NUM => ConstantKind::Float(f32::from_bits(p.read32()?)),
        LONG_CONST_NUM => ConstantKind::Long(read_long(p)? as i64),
        DOUBLE_CONST_NUM => ConstantKind::Double(f64::from_bits(read_long(p)?)),
        CLASS_CONST_NUM => ConstantKind::Class { name_index: p.read16()? },
        STRING_CONST_NUM => ConstantKind::String { string_index: p.read16()? },
        FIELDREF_CONST_NUM => ConstantKind::Fieldref(parse_member_ref(p)?),
        METHODREF_CONST_NUM => ConstantKind::Methodref(parse_member_ref(p)?),
        INTERFACE_METHODREF_CONST_NUM => ConstantKind::InterfaceMethodref(parse_member_ref(p)?),
        NAME_AND_TYPE_CONST_NUM => {
            let name_index = p.read16()?;
            let descriptor_index = p.read16()?;
            ConstantKind::NameAndType { name_index, descriptor_index }
        }
        METHOD_HANDLE_CONST_NUM => {
            let reference_kind = p.read8()?;
            let reference_index = p.read16()?;
            ConstantKind::MethodHandle { reference_kind, reference_index }
        }
        METHOD_TYPE_CONST_NUM => ConstantKind::MethodType { descriptor_index: p.read16()? },
        DYNAMIC_CONST_NUM => {
            let bootstrap_method_attr_index = p.read16()?;
            let name_and_type_index = p.read16()?;
            ConstantKind::Dynamic { bootstrap_method_attr_index, name_and_type_index }
        }
        INVOKE_DYNAMIC_CONST_NUM => {
            let bootstrap_method_attr_index = p.read16()?;
            let name_and_type_index = p.read16()?;
            ConstantKind::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index }
        }
        MODULE_CONST_NUM => ConstantKind::Module { name_index: p.read16()? },
        PACKAGE_CONST_NUM => ConstantKind::Package { name_index: p.read16()? },
        tag => return Err(ClassfileReadError::UnknownConstantTag { tag, index }),
    })
}

/// Slot 0 and the slot after each long or double hold `InvalidConstant`.
pub fn parse_constant_infos(p: &mut dyn ParsingContext, constant_pool_count: u16) -> Result<Vec<ConstantKind>, ClassfileReadError> {
    let mut res = vec![ConstantKind::InvalidConstant];
    while res.len() < constant_pool_count as usize {
        let index = res.len() as u16;
        let constant = parse_constant_info(p, index)?;
        let wide = matches!(constant, ConstantKind::Long(_) | ConstantKind::Double(_));
        res.push(constant);
        if wide {
            res.push(ConstantKind::InvalidConstant);
        }
    }
    Ok(res)
}
