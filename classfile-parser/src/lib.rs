#[macro_use]
extern crate num_derive;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::trace;

use rust_jvm_common::classfile::{Classfile, ConstantPool, FieldInfo, MethodInfo};
use rust_jvm_common::EXPECTED_CLASSFILE_MAGIC;
use rust_jvm_common::loading::{ClassfileReadError, ClassfileReader};

use crate::attribute_infos::{AttributeType, parse_attributes};
use crate::constant_infos::parse_constant_infos;
use crate::parsing_util::{ParsingContext, ReadParsingContext};

pub mod attribute_infos;
pub mod code;
pub mod constant_infos;
pub mod parsing_util;

fn parse_interfaces(p: &mut dyn ParsingContext) -> Result<Vec<u16>, ClassfileReadError> {
    let interfaces_count = p.read16()?;
    let mut res = Vec::with_capacity(interfaces_count as usize);
    for _ in 0..interfaces_count {
        res.push(p.read16()?)
    }
    Ok(res)
}

fn parse_field(p: &mut dyn ParsingContext, constant_pool: &ConstantPool) -> Result<FieldInfo, ClassfileReadError> {
    let access_flags = p.read16()?;
    let name_index = p.read16()?;
    let descriptor_index = p.read16()?;
    let constant_value = parse_attributes(p, constant_pool)?.into_iter().find_map(|attribute| match attribute {
        AttributeType::ConstantValue(index) => Some(index),
        _ => None,
    });
    Ok(FieldInfo { access_flags, name_index, descriptor_index, constant_value })
}

fn parse_method(p: &mut dyn ParsingContext, constant_pool: &ConstantPool) -> Result<MethodInfo, ClassfileReadError> {
    let access_flags = p.read16()?;
    let name_index = p.read16()?;
    let descriptor_index = p.read16()?;
    let code = parse_attributes(p, constant_pool)?.into_iter().find_map(|attribute| match attribute {
        AttributeType::Code(code) => Some(code),
        _ => None,
    });
    Ok(MethodInfo { access_flags, name_index, descriptor_index, code })
}

pub fn parse_class_file(read: &mut dyn Read) -> Result<Classfile, ClassfileReadError> {
    let mut p = ReadParsingContext { read };
    let magic = p.read32()?;
    if magic != EXPECTED_CLASSFILE_MAGIC {
        return Err(ClassfileReadError::BadMagic(magic));
    }
    let minor_version = p.read16()?;
    let major_version = p.read16()?;
    let constant_pool_count = p.read16()?;
    let constant_pool = ConstantPool::new(parse_constant_infos(&mut p, constant_pool_count)?);
    let access_flags = p.read16()?;
    let this_class = p.read16()?;
    let super_class = match p.read16()? {
        0 => None,
        super_class => Some(super_class),
    };
    let interfaces = parse_interfaces(&mut p)?;
    let fields_count = p.read16()?;
    let mut fields = Vec::with_capacity(fields_count as usize);
    for _ in 0..fields_count {
        fields.push(parse_field(&mut p, &constant_pool)?);
    }
    let methods_count = p.read16()?;
    let mut methods = Vec::with_capacity(methods_count as usize);
    for _ in 0..methods_count {
        methods.push(parse_method(&mut p, &constant_pool)?);
    }
    parse_attributes(&mut p, &constant_pool)?;
    Ok(Classfile {
        minor_version,
        major_version,
        constant_pool,
        access_flags,
        this_class,
        super_class,
        interfaces,
        fields,
        methods,
    })
}

/// Reads class files from disk.
#[derive(Debug, Default, Copy, Clone)]
pub struct ClassfileParser;

impl ClassfileReader for ClassfileParser {
    fn read_classfile(&self, path: &Path) -> Result<Classfile, ClassfileReadError> {
        trace!("parsing {}", path.display());
        let mut reader = BufReader::new(File::open(path)?);
        parse_class_file(&mut reader)
    }
}
