use thiserror::Error;

use crate::{CPIndex, InstructionIndex};
use crate::classnames::ClassName;
use crate::ptype::PrimitiveKind;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_PROTECTED: u16 = 0x0004;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_SYNCHRONIZED: u16 = 0x0020;
pub const ACC_VOLATILE: u16 = 0x0040;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_TRANSIENT: u16 = 0x0080;
pub const ACC_VARARGS: u16 = 0x0080;
pub const ACC_NATIVE: u16 = 0x0100;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_STRICT: u16 = 0x0800;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ConstantPoolError {
    #[error("constant pool index {0} out of range")]
    BadIndex(CPIndex),
    #[error("constant pool entry {index} is {found}, expected {expected}")]
    WrongKind { index: CPIndex, expected: &'static str, found: &'static str },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MemberRef {
    pub class_index: CPIndex,
    pub name_and_type_index: CPIndex,
}

#[derive(Debug, Clone, PartialEq, strum_macros::IntoStaticStr)]
pub enum ConstantKind {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: CPIndex },
    String { string_index: CPIndex },
    Fieldref(MemberRef),
    Methodref(MemberRef),
    InterfaceMethodref(MemberRef),
    NameAndType { name_index: CPIndex, descriptor_index: CPIndex },
    MethodHandle { reference_kind: u8, reference_index: CPIndex },
    MethodType { descriptor_index: CPIndex },
    Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: CPIndex },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: CPIndex },
    Module { name_index: CPIndex },
    Package { name_index: CPIndex },
    /// Slot 0 and the slot following a long or double.
    InvalidConstant,
}

/// Owner, name and descriptor of a field or method reference.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct MemberRefInfo {
    pub class_name: ClassName,
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPool {
    entries: Vec<ConstantKind>,
}

impl ConstantPool {
    /// `entries[0]` must be the unusable zero slot.
    pub fn new(entries: Vec<ConstantKind>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: CPIndex) -> Result<&ConstantKind, ConstantPoolError> {
        match self.entries.get(index as usize) {
            None | Some(ConstantKind::InvalidConstant) => Err(ConstantPoolError::BadIndex(index)),
            Some(entry) => Ok(entry),
        }
    }

    fn wrong_kind(&self, index: CPIndex, expected: &'static str) -> ConstantPoolError {
        match self.get(index) {
            Ok(found) => ConstantPoolError::WrongKind { index, expected, found: found.into() },
            Err(err) => err,
        }
    }

    pub fn utf8(&self, index: CPIndex) -> Result<&str, ConstantPoolError> {
        match self.get(index)? {
            ConstantKind::Utf8(str_) => Ok(str_.as_str()),
            _ => Err(self.wrong_kind(index, "Utf8")),
        }
    }

    pub fn class_name(&self, index: CPIndex) -> Result<ClassName, ConstantPoolError> {
        match self.get(index)? {
            ConstantKind::Class { name_index } => Ok(ClassName::new(self.utf8(*name_index)?)),
            _ => Err(self.wrong_kind(index, "Class")),
        }
    }

    pub fn name_and_type(&self, index: CPIndex) -> Result<(&str, &str), ConstantPoolError> {
        match self.get(index)? {
            ConstantKind::NameAndType { name_index, descriptor_index } => Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?)),
            _ => Err(self.wrong_kind(index, "NameAndType")),
        }
    }

    /// Accepts field, method and interface method references alike.
    pub fn member_ref(&self, index: CPIndex) -> Result<MemberRefInfo, ConstantPoolError> {
        let member_ref = match self.get(index)? {
            ConstantKind::Fieldref(member_ref) | ConstantKind::Methodref(member_ref) | ConstantKind::InterfaceMethodref(member_ref) => member_ref,
            _ => return Err(self.wrong_kind(index, "Fieldref or Methodref")),
        };
        let class_name = self.class_name(member_ref.class_index)?;
        let (name, descriptor) = self.name_and_type(member_ref.name_and_type_index)?;
        Ok(MemberRefInfo { class_name, name: name.to_string(), descriptor: descriptor.to_string() })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classfile {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: u16,
    pub this_class: CPIndex,
    /// Absent only for the root of the hierarchy.
    pub super_class: Option<CPIndex>,
    pub interfaces: Vec<CPIndex>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
}

impl Classfile {
    pub fn class_name(&self) -> Result<ClassName, ConstantPoolError> {
        self.constant_pool.class_name(self.this_class)
    }

    pub fn super_class_name(&self) -> Result<Option<ClassName>, ConstantPoolError> {
        self.super_class.map(|super_class| self.constant_pool.class_name(super_class)).transpose()
    }

    pub fn interface_names(&self) -> Result<Vec<ClassName>, ConstantPoolError> {
        self.interfaces.iter().map(|interface| self.constant_pool.class_name(*interface)).collect()
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub access_flags: u16,
    pub name_index: CPIndex,
    pub descriptor_index: CPIndex,
    /// From the `ConstantValue` attribute.
    pub constant_value: Option<CPIndex>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name_index: CPIndex,
    pub descriptor_index: CPIndex,
    pub code: Option<Code>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub instructions: Vec<InstructionInfo>,
    pub exception_table: Vec<ExceptionTableElem>,
}

/// Carried for completeness. Handler dispatch is not performed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ExceptionTableElem {
    pub start_pc: InstructionIndex,
    pub end_pc: InstructionIndex,
    pub handler_pc: InstructionIndex,
    pub catch_type: Option<CPIndex>,
}

#[allow(non_camel_case_types)]
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, FromPrimitive)]
pub enum Atype {
    TBoolean = 4,
    TChar = 5,
    TFloat = 6,
    TDouble = 7,
    TByte = 8,
    TShort = 9,
    TInt = 10,
    TLong = 11,
}

impl Atype {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Atype::TBoolean => PrimitiveKind::Boolean,
            Atype::TChar => PrimitiveKind::Char,
            Atype::TFloat => PrimitiveKind::Float,
            Atype::TDouble => PrimitiveKind::Double,
            Atype::TByte => PrimitiveKind::Byte,
            Atype::TShort => PrimitiveKind::Short,
            Atype::TInt => PrimitiveKind::Int,
            Atype::TLong => PrimitiveKind::Long,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IInc {
    pub index: u16,
    pub const_: i16,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct InvokeInterface {
    pub index: CPIndex,
    pub count: u8,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MultiNewArray {
    pub index: CPIndex,
    pub dims: u8,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TableSwitch {
    pub default: InstructionIndex,
    pub low: i32,
    pub high: i32,
    pub targets: Vec<InstructionIndex>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LookupSwitch {
    pub default: InstructionIndex,
    pub pairs: Vec<(i32, InstructionIndex)>,
}

/// Decoded instruction. Short forms such as `iload_0` are normalized to their indexed form,
/// `wide` is folded into 16 bit local indices, and branch operands are absolute instruction indices.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionInfo {
    aaload,
    aastore,
    aconst_null,
    aload(u16),
    anewarray(CPIndex),
    areturn,
    arraylength,
    astore(u16),
    athrow,
    baload,
    bastore,
    bipush(i8),
    caload,
    castore,
    checkcast(CPIndex),
    d2f,
    d2i,
    d2l,
    dadd,
    daload,
    dastore,
    dcmpg,
    dcmpl,
    dconst(f64),
    ddiv,
    dload(u16),
    dmul,
    dneg,
    drem,
    dreturn,
    dstore(u16),
    dsub,
    dup,
    dup_x1,
    dup_x2,
    dup2,
    dup2_x1,
    dup2_x2,
    f2d,
    f2i,
    f2l,
    fadd,
    faload,
    fastore,
    fcmpg,
    fcmpl,
    fconst(f32),
    fdiv,
    fload(u16),
    fmul,
    fneg,
    frem,
    freturn,
    fstore(u16),
    fsub,
    getfield(CPIndex),
    getstatic(CPIndex),
    goto_(InstructionIndex),
    i2b,
    i2c,
    i2d,
    i2f,
    i2l,
    i2s,
    iadd,
    iaload,
    iand,
    iastore,
    iconst(i32),
    idiv,
    if_acmpeq(InstructionIndex),
    if_acmpne(InstructionIndex),
    if_icmpeq(InstructionIndex),
    if_icmpne(InstructionIndex),
    if_icmplt(InstructionIndex),
    if_icmpge(InstructionIndex),
    if_icmpgt(InstructionIndex),
    if_icmple(InstructionIndex),
    ifeq(InstructionIndex),
    ifne(InstructionIndex),
    iflt(InstructionIndex),
    ifge(InstructionIndex),
    ifgt(InstructionIndex),
    ifle(InstructionIndex),
    ifnonnull(InstructionIndex),
    ifnull(InstructionIndex),
    iinc(IInc),
    iload(u16),
    imul,
    ineg,
    instanceof(CPIndex),
    invokedynamic(CPIndex),
    invokeinterface(InvokeInterface),
    invokespecial(CPIndex),
    invokestatic(CPIndex),
    invokevirtual(CPIndex),
    ior,
    irem,
    ireturn,
    ishl,
    ishr,
    istore(u16),
    isub,
    iushr,
    ixor,
    jsr(InstructionIndex),
    l2d,
    l2f,
    l2i,
    ladd,
    laload,
    land,
    lastore,
    lcmp,
    lconst(i64),
    ldc(CPIndex),
    ldc2_w(CPIndex),
    ldiv,
    lload(u16),
    lmul,
    lneg,
    lookupswitch(LookupSwitch),
    lor,
    lrem,
    lreturn,
    lshl,
    lshr,
    lstore(u16),
    lsub,
    lushr,
    lxor,
    monitorenter,
    monitorexit,
    multianewarray(MultiNewArray),
    new(CPIndex),
    newarray(Atype),
    nop,
    pop,
    pop2,
    putfield(CPIndex),
    putstatic(CPIndex),
    ret(u16),
    return_,
    saload,
    sastore,
    sipush(i16),
    swap,
    tableswitch(TableSwitch),
}
