use std::io::Cursor;

use classfile_parser::{ClassfileParser, parse_class_file};
use rust_jvm_common::classfile::{ACC_FINAL, ACC_PUBLIC, ACC_STATIC, ConstantKind, ExceptionTableElem, InstructionInfo};
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::loading::{ClassfileReadError, ClassfileReader};

struct ClassBytes(Vec<u8>);

impl ClassBytes {
    fn u8(&mut self, value: u8) -> &mut Self {
        self.0.push(value);
        self
    }

    fn u16(&mut self, value: u16) -> &mut Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn u32(&mut self, value: u32) -> &mut Self {
        self.0.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn utf8(&mut self, str_: &str) -> &mut Self {
        self.u8(1).u16(str_.len() as u16);
        self.0.extend_from_slice(str_.as_bytes());
        self
    }
}

const UNKNOWN_TAG_POSITION: usize = 10;

fn hello_class() -> Vec<u8> {
    let mut bytes = ClassBytes(vec![]);
    bytes.u32(0xCAFEBABE).u16(0).u16(52).u16(15);
    bytes.utf8("Hello");
    bytes.u8(7).u16(1);
    bytes.utf8("java/lang/Object");
    bytes.u8(7).u16(3);
    bytes.utf8("K");
    bytes.utf8("I");
    bytes.utf8("ConstantValue");
    bytes.u8(3).u32(7);
    bytes.utf8("main");
    bytes.utf8("([Ljava/lang/String;)V");
    bytes.utf8("Code");
    bytes.u8(5).u32(0).u32(1);
    bytes.utf8("SourceFile");
    // access, this, super, no interfaces
    bytes.u16(ACC_PUBLIC).u16(2).u16(4).u16(0);
    // one constant field
    bytes.u16(1).u16(ACC_STATIC | ACC_FINAL).u16(5).u16(6).u16(1);
    bytes.u16(7).u32(2).u16(8);
    // one method with a code attribute
    bytes.u16(1).u16(ACC_PUBLIC | ACC_STATIC).u16(9).u16(10).u16(1);
    bytes.u16(11).u32(8 + 4 + 2 + 8 + 2);
    bytes.u16(1).u16(2).u32(4);
    bytes.u8(0x10).u8(7).u8(0x3c).u8(0xb1);
    bytes.u16(1).u16(0).u16(4).u16(3).u16(0);
    bytes.u16(0);
    // one skipped class attribute
    bytes.u16(1).u16(14).u32(2).u16(1);
    bytes.0
}

#[test]
fn parse_hello() {
    let classfile = parse_class_file(&mut Cursor::new(hello_class())).unwrap();
    assert_eq!(classfile.major_version, 52);
    assert_eq!(classfile.class_name().unwrap(), ClassName::new("Hello"));
    assert_eq!(classfile.super_class_name().unwrap(), Some(ClassName::object()));
    assert!(classfile.interfaces.is_empty());

    let field = &classfile.fields[0];
    assert_eq!(classfile.constant_pool.utf8(field.name_index).unwrap(), "K");
    assert_eq!(field.constant_value, Some(8));
    assert_eq!(classfile.constant_pool.get(8).unwrap(), &ConstantKind::Integer(7));
    assert_eq!(classfile.constant_pool.get(12).unwrap(), &ConstantKind::Long(1));
    assert!(classfile.constant_pool.get(13).is_err());

    let method = &classfile.methods[0];
    assert_eq!(classfile.constant_pool.utf8(method.descriptor_index).unwrap(), "([Ljava/lang/String;)V");
    let code = method.code.as_ref().unwrap();
    assert_eq!(code.max_stack, 1);
    assert_eq!(code.max_locals, 2);
    assert_eq!(code.instructions, vec![InstructionInfo::bipush(7), InstructionInfo::istore(1), InstructionInfo::return_]);
    assert_eq!(code.exception_table, vec![ExceptionTableElem { start_pc: 0, end_pc: 3, handler_pc: 2, catch_type: None }]);
}

#[test]
fn bad_magic() {
    let mut bytes = hello_class();
    bytes[0] = 0xCB;
    assert!(matches!(parse_class_file(&mut Cursor::new(bytes)), Err(ClassfileReadError::BadMagic(0xCBFEBABE))));
}

#[test]
fn truncated() {
    let mut bytes = hello_class();
    bytes.truncate(bytes.len() - 3);
    assert!(matches!(parse_class_file(&mut Cursor::new(bytes)), Err(ClassfileReadError::Truncated)));
}

#[test]
fn unknown_constant_tag() {
    let mut bytes = hello_class();
    assert_eq!(bytes[UNKNOWN_TAG_POSITION], 1);
    bytes[UNKNOWN_TAG_POSITION] = 2;
    assert!(matches!(parse_class_file(&mut Cursor::new(bytes)), Err(ClassfileReadError::UnknownConstantTag { tag: 2, index: 1 })));
}

#[test]
fn read_from_disk() {
    let dir = std::env::temp_dir().join(format!("classfile-parser-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("Hello.class");
    std::fs::write(&path, hello_class()).unwrap();
    let classfile = ClassfileParser.read_classfile(&path).unwrap();
    assert_eq!(classfile.methods.len(), 1);
    assert!(matches!(ClassfileParser.read_classfile(&dir.join("Missing.class")), Err(ClassfileReadError::Io(_))));
    std::fs::remove_dir_all(&dir).unwrap();
}
