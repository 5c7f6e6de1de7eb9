use num_traits::FromPrimitive;

use rust_jvm_common::classfile::{Atype, IInc, InstructionInfo, InvokeInterface, LookupSwitch, MultiNewArray, TableSwitch};
use rust_jvm_common::InstructionIndex;
use rust_jvm_common::loading::ClassfileReadError;

#[allow(non_camel_case_types)]
#[repr(u8)]
#[derive(Debug, Copy, Clone, FromPrimitive)]
pub enum InstructionTypeNum {
    nop = 0,
    aconst_null = 1,
    iconst_m1 = 2,
    iconst_0 = 3,
    iconst_1 = 4,
    iconst_2 = 5,
    iconst_3 = 6,
    iconst_4 = 7,
    iconst_5 = 8,
    lconst_0 = 9,
    lconst_1 = 10,
    fconst_0 = 11,
    fconst_1 = 12,
    fconst_2 = 13,
    dconst_0 = 14,
    dconst_1 = 15,
    bipush = 16,
    sipush = 17,
    ldc = 18,
    ldc_w = 19,
    ldc2_w = 20,
    iload = 21,
    lload = 22,
    fload = 23,
    dload = 24,
    aload = 25,
    iload_0 = 26,
    iload_1 = 27,
    iload_2 = 28,
    iload_3 = 29,
    lload_0 = 30,
    lload_1 = 31,
    lload_2 = 32,
    lload_3 = 33,
    fload_0 = 34,
    fload_1 = 35,
    fload_2 = 36,
    fload_3 = 37,
    dload_0 = 38,
    dload_1 = 39,
    dload_2 = 40,
    dload_3 = 41,
    aload_0 = 42,
    aload_1 = 43,
    aload_2 = 44,
    aload_3 = 45,
    iaload = 46,
    laload = 47,
    faload = 48,
    daload = 49,
    aaload = 50,
    baload = 51,
    caload = 52,
    saload = 53,
    istore = 54,
    lstore = 55,
    fstore = 56,
    dstore = 57,
    astore = 58,
    istore_0 = 59,
    istore_1 = 60,
    istore_2 = 61,
    istore_3 = 62,
    lstore_0 = 63,
    lstore_1 = 64,
    lstore_2 = 65,
    lstore_3 = 66,
    fstore_0 = 67,
    fstore_1 = 68,
    fstore_2 = 69,
    fstore_3 = 70,
    dstore_0 = 71,
    dstore_1 = 72,
    dstore_2 = 73,
    dstore_3 = 74,
    astore_0 = 75,
    astore_1 = 76,
    astore_2 = 77,
    astore_3 = 78,
    iastore = 79,
    lastore = 80,
    fastore = 81,
    dastore = 82,
    aastore = 83,
    bastore = 84,
    castore = 85,
    sastore = 86,
    pop = 87,
    pop2 = 88,
    dup = 89,
    dup_x1 = 90,
    dup_x2 = 91,
    dup2 = 92,
    dup2_x1 = 93,
    dup2_x2 = 94,
    swap = 95,
    iadd = 96,
    ladd = 97,
    fadd = 98,
    dadd = 99,
    isub = 100,
    lsub = 101,
    fsub = 102,
    dsub = 103,
    imul = 104,
    lmul = 105,
    fmul = 106,
    dmul = 107,
    idiv = 108,
    ldiv = 109,
    fdiv = 110,
    ddiv = 111,
    irem = 112,
    lrem = 113,
    frem = 114,
    drem = 115,
    ineg = 116,
    lneg = 117,
    fneg = 118,
    dneg = 119,
    ishl = 120,
    lshl = 121,
    ishr = 122,
    lshr = 123,
    iushr = 124,
    lushr = 125,
    iand = 126,
    land = 127,
    ior = 128,
    lor = 129,
    ixor = 130,
    lxor = 131,
    iinc = 132,
    i2l = 133,
    i2f = 134,
    i2d = 135,
    l2i = 136,
    l2f = 137,
    l2d = 138,
    f2i = 139,
    f2l = 140,
    f2d = 141,
    d2i = 142,
    d2l = 143,
    d2f = 144,
    i2b = 145,
    i2c = 146,
    i2s = 147,
    lcmp = 148,
    fcmpl = 149,
    fcmpg = 150,
    dcmpl = 151,
    dcmpg = 152,
    ifeq = 153,
    ifne = 154,
    iflt = 155,
    ifge = 156,
    ifgt = 157,
    ifle = 158,
    if_icmpeq = 159,
    if_icmpne = 160,
    if_icmplt = 161,
    if_icmpge = 162,
    if_icmpgt = 163,
    if_icmple = 164,
    if_acmpeq = 165,
    if_acmpne = 166,
    goto_ = 167,
    jsr = 168,
    ret = 169,
    tableswitch = 170,
    lookupswitch = 171,
    ireturn = 172,
    lreturn = 173,
    freturn = 174,
    dreturn = 175,
    areturn = 176,
    return_ = 177,
    getstatic = 178,
    putstatic = 179,
    getfield = 180,
    putfield = 181,
    invokevirtual = 182,
    invokespecial = 183,
    invokestatic = 184,
    invokeinterface = 185,
    invokedynamic = 186,
    new = 187,
    newarray = 188,
    anewarray = 189,
    arraylength = 190,
    athrow = 191,
    checkcast = 192,
    instanceof = 193,
    monitorenter = 194,
    monitorexit = 195,
    wide = 196,
    multianewarray = 197,
    ifnull = 198,
    ifnonnull = 199,
    goto_w = 200,
    jsr_w = 201,
}

pub struct CodeParserContext<'l> {
    pub offset: usize,
    code: &'l [u8],
}

impl<'l> CodeParserContext<'l> {
    pub fn new(code: &'l [u8]) -> Self {
        Self { offset: 0, code }
    }

    fn read_u8(&mut self) -> Result<u8, ClassfileReadError> {
        let res = *self.code.get(self.offset).ok_or(ClassfileReadError::Truncated)?;
        self.offset += 1;
        Ok(res)
    }

    fn read_i8(&mut self) -> Result<i8, ClassfileReadError> {
        Ok(self.read_u8()? as i8)
    }

    fn read_u16(&mut self) -> Result<u16, ClassfileReadError> {
        let byte1 = self.read_u8()? as u16;
        let byte2 = self.read_u8()? as u16;
        Ok(byte1 << 8 | byte2)
    }

    fn read_i16(&mut self) -> Result<i16, ClassfileReadError> {
        Ok(self.read_u16()? as i16)
    }

    fn read_i32(&mut self) -> Result<i32, ClassfileReadError> {
        let high = self.read_u16()? as u32;
        let low = self.read_u16()? as u32;
        Ok((high << 16 | low) as i32)
    }

    fn skip_padding(&mut self) -> Result<(), ClassfileReadError> {
        while self.offset % 4 != 0 {
            self.read_u8()?;
        }
        Ok(())
    }
}

/// Absolute byte offset of a branch. Remapped to an instruction index once decoding finishes.
fn branch_target(start: usize, relative: i32) -> Result<u16, ClassfileReadError> {
    let target = start as i64 + relative as i64;
    u16::try_from(target).map_err(|_| ClassfileReadError::Malformed(format!("branch from {} to byte offset {}", start, target)))
}

fn read_table_switch(c: &mut CodeParserContext, start: usize) -> Result<TableSwitch, ClassfileReadError> {
    c.skip_padding()?;
    let default = branch_target(start, c.read_i32()?)?;
    let low = c.read_i32()?;
    let high = c.read_i32()?;
    if high < low {
        return Err(ClassfileReadError::Malformed(format!("tableswitch low {} above high {}", low, high)));
    }
    let mut targets = vec![];
    for _ in low..=high {
        targets.push(branch_target(start, c.read_i32()?)?);
    }
    Ok(TableSwitch { default, low, high, targets })
}

fn read_lookup_switch(c: &mut CodeParserContext, start: usize) -> Result<LookupSwitch, ClassfileReadError> {
    c.skip_padding()?;
    let default = branch_target(start, c.read_i32()?)?;
    let npairs = c.read_i32()?;
    if npairs < 0 {
        return Err(ClassfileReadError::Malformed(format!("lookupswitch with {} pairs", npairs)));
    }
    let mut pairs = vec![];
    for _ in 0..npairs {
        let key = c.read_i32()?;
        pairs.push((key, branch_target(start, c.read_i32()?)?));
    }
    Ok(LookupSwitch { default, pairs })
}

fn read_wide(c: &mut CodeParserContext) -> Result<InstructionInfo, ClassfileReadError> {
    let opcode_offset = c.offset;
    let opcode = c.read_u8()?;
    let modified = InstructionTypeNum::from_u8(opcode).ok_or(ClassfileReadError::UnknownOpcode { opcode, offset: opcode_offset })?;
    Ok(match modified {
        InstructionTypeNum::iinc => {
            let index = c.read_u16()?;
            let const_ = c.read_i16()?;
            InstructionInfo::iinc(IInc { index, const_ })
        }
        InstructionTypeNum::aload => InstructionInfo::aload(c.read_u16()?),
        InstructionTypeNum::dload => InstructionInfo::dload(c.read_u16()?),
        InstructionTypeNum::fload => InstructionInfo::fload(c.read_u16()?),
        InstructionTypeNum::iload => InstructionInfo::iload(c.read_u16()?),
        InstructionTypeNum::lload => InstructionInfo::lload(c.read_u16()?),
        InstructionTypeNum::astore => InstructionInfo::astore(c.read_u16()?),
        InstructionTypeNum::dstore => InstructionInfo::dstore(c.read_u16()?),
        InstructionTypeNum::fstore => InstructionInfo::fstore(c.read_u16()?),
        InstructionTypeNum::istore => InstructionInfo::istore(c.read_u16()?),
        InstructionTypeNum::lstore => InstructionInfo::lstore(c.read_u16()?),
        InstructionTypeNum::ret => InstructionInfo::ret(c.read_u16()?),
        _ => return Err(ClassfileReadError::UnknownOpcode { opcode, offset: opcode_offset }),
    })
}

/// Decodes one instruction. Branch operands come back as absolute byte offsets.
pub fn parse_instruction(c: &mut CodeParserContext) -> Result<InstructionInfo, ClassfileReadError> {
    let start = c.offset;
    let opcode = c.read_u8()?;
    let instruction_type = InstructionTypeNum::from_u8(opcode).ok_or(ClassfileReadError::UnknownOpcode { opcode, offset: start })?;
    Ok(match instruction_type {
        InstructionTypeNum::aaload => InstructionInfo::aaload,
        InstructionTypeNum::aastore => InstructionInfo::aastore,
        InstructionTypeNum::aconst_null => InstructionInfo::aconst_null,
        InstructionTypeNum::areturn => InstructionInfo::areturn,
        InstructionTypeNum::arraylength => InstructionInfo::arraylength,
        InstructionTypeNum::athrow => InstructionInfo::athrow,
        InstructionTypeNum::baload => InstructionInfo::baload,
        InstructionTypeNum::bastore => InstructionInfo::bastore,
        InstructionTypeNum::caload => InstructionInfo::caload,
        InstructionTypeNum::castore => InstructionInfo::castore,
        InstructionTypeNum::d2f => InstructionInfo::d2f,
        InstructionTypeNum::d2i => InstructionInfo::d2i,
        InstructionTypeNum::d2l => InstructionInfo::d2l,
        InstructionTypeNum::dadd => InstructionInfo::dadd,
        InstructionTypeNum::daload => InstructionInfo::daload,
        InstructionTypeNum::dastore => InstructionInfo::dastore,
        InstructionTypeNum::dcmpg => InstructionInfo::dcmpg,
        InstructionTypeNum::dcmpl => InstructionInfo::dcmpl,
        InstructionTypeNum::ddiv => InstructionInfo::ddiv,
        InstructionTypeNum::dmul => InstructionInfo::dmul,
        InstructionTypeNum::dneg => InstructionInfo::dneg,
        InstructionTypeNum::drem => InstructionInfo::drem,
        InstructionTypeNum::dreturn => InstructionInfo::dreturn,
        InstructionTypeNum::dsub => InstructionInfo::dsub,
        InstructionTypeNum::dup => InstructionInfo::dup,
        InstructionTypeNum::dup_x1 => InstructionInfo::dup_x1,
        InstructionTypeNum::dup_x2 => InstructionInfo::dup_x2,
        InstructionTypeNum::dup2 => InstructionInfo::dup2,
        InstructionTypeNum::dup2_x1 => InstructionInfo::dup2_x1,
        InstructionTypeNum::dup2_x2 => InstructionInfo::dup2_x2,
        InstructionTypeNum::f2d => InstructionInfo::f2d,
        InstructionTypeNum::f2i => InstructionInfo::f2i,
        InstructionTypeNum::f2l => InstructionInfo::f2l,
        InstructionTypeNum::fadd => InstructionInfo::fadd,
        InstructionTypeNum::faload => InstructionInfo::faload,
        InstructionTypeNum::fastore => InstructionInfo::fastore,
        InstructionTypeNum::fcmpg => InstructionInfo::fcmpg,
        InstructionTypeNum::fcmpl => InstructionInfo::fcmpl,
        InstructionTypeNum::fdiv => InstructionInfo::fdiv,
        InstructionTypeNum::fmul => InstructionInfo::fmul,
        InstructionTypeNum::fneg => InstructionInfo::fneg,
        InstructionTypeNum::frem => InstructionInfo::frem,
        InstructionTypeNum::freturn => InstructionInfo::freturn,
        InstructionTypeNum::fsub => InstructionInfo::fsub,
        InstructionTypeNum::i2b => InstructionInfo::i2b,
        InstructionTypeNum::i2c => InstructionInfo::i2c,
        InstructionTypeNum::i2d => InstructionInfo::i2d,
        InstructionTypeNum::i2f => InstructionInfo::i2f,
        InstructionTypeNum::i2l => InstructionInfo::i2l,
        InstructionTypeNum::i2s => InstructionInfo::i2s,
        InstructionTypeNum::iadd => InstructionInfo::iadd,
        InstructionTypeNum::iaload => InstructionInfo::iaload,
        InstructionTypeNum::iand => InstructionInfo::iand,
        InstructionTypeNum::iastore => InstructionInfo::iastore,
        InstructionTypeNum::idiv => InstructionInfo::idiv,
        InstructionTypeNum::imul => InstructionInfo::imul,
        InstructionTypeNum::ineg => InstructionInfo::ineg,
        InstructionTypeNum::ior => InstructionInfo::ior,
        InstructionTypeNum::irem => InstructionInfo::irem,
        InstructionTypeNum::ireturn => InstructionInfo::ireturn,
        InstructionTypeNum::ishl => InstructionInfo::ishl,
        InstructionTypeNum::ishr => InstructionInfo::ishr,
        InstructionTypeNum::isub => InstructionInfo::isub,
        InstructionTypeNum::iushr => InstructionInfo::iushr,
        InstructionTypeNum::ixor => InstructionInfo::ixor,
        InstructionTypeNum::l2d => InstructionInfo::l2d,
        InstructionTypeNum::l2f => InstructionInfo::l2f,
        InstructionTypeNum::l2i => InstructionInfo::l2i,
        InstructionTypeNum::ladd => InstructionInfo::ladd,
        InstructionTypeNum::laload => InstructionInfo::laload,
        InstructionTypeNum::land => InstructionInfo::land,
        InstructionTypeNum::lastore => InstructionInfo::lastore,
        InstructionTypeNum::lcmp => InstructionInfo::lcmp,
        InstructionTypeNum::ldiv => InstructionInfo::ldiv,
        InstructionTypeNum::lmul => InstructionInfo::lmul,
        InstructionTypeNum::lneg => InstructionInfo::lneg,
        InstructionTypeNum::lor => InstructionInfo::lor,
        InstructionTypeNum::lrem => InstructionInfo::lrem,
        InstructionTypeNum::lreturn => InstructionInfo::lreturn,
        InstructionTypeNum::lshl => InstructionInfo::lshl,
        InstructionTypeNum::lshr => InstructionInfo::lshr,
        InstructionTypeNum::lsub => InstructionInfo::lsub,
        InstructionTypeNum::lushr => InstructionInfo::lushr,
        InstructionTypeNum::lxor => InstructionInfo::lxor,
        InstructionTypeNum::monitorenter => InstructionInfo::monitorenter,
        InstructionTypeNum::monitorexit => InstructionInfo::monitorexit,
        InstructionTypeNum::nop => InstructionInfo::nop,
        InstructionTypeNum::pop => InstructionInfo::pop,
        InstructionTypeNum::pop2 => InstructionInfo::pop2,
        InstructionTypeNum::return_ => InstructionInfo::return_,
        InstructionTypeNum::saload => InstructionInfo::saload,
        InstructionTypeNum::sastore => InstructionInfo::sastore,
        InstructionTypeNum::swap => InstructionInfo::swap,
        InstructionTypeNum::aload => InstructionInfo::aload(c.read_u8()? as u16),
        InstructionTypeNum::aload_0 => InstructionInfo::aload(0),
        InstructionTypeNum::aload_1 => InstructionInfo::aload(1),
        InstructionTypeNum::aload_2 => InstructionInfo::aload(2),
        InstructionTypeNum::aload_3 => InstructionInfo::aload(3),
        InstructionTypeNum::astore => InstructionInfo::astore(c.read_u8()? as u16),
        InstructionTypeNum::astore_0 => InstructionInfo::astore(0),
        InstructionTypeNum::astore_1 => InstructionInfo::astore(1),
        InstructionTypeNum::astore_2 => InstructionInfo::astore(2),
        InstructionTypeNum::astore_3 => InstructionInfo::astore(3),
        InstructionTypeNum::dload => InstructionInfo::dload(c.read_u8()? as u16),
        InstructionTypeNum::dload_0 => InstructionInfo::dload(0),
        InstructionTypeNum::dload_1 => InstructionInfo::dload(1),
        InstructionTypeNum::dload_2 => InstructionInfo::dload(2),
        InstructionTypeNum::dload_3 => InstructionInfo::dload(3),
        InstructionTypeNum::dstore => InstructionInfo::dstore(c.read_u8()? as u16),
        InstructionTypeNum::dstore_0 => InstructionInfo::dstore(0),
        InstructionTypeNum::dstore_1 => InstructionInfo::dstore(1),
        InstructionTypeNum::dstore_2 => InstructionInfo::dstore(2),
        InstructionTypeNum::dstore_3 => InstructionInfo::dstore(3),
        InstructionTypeNum::fload => InstructionInfo::fload(c.read_u8()? as u16),
        InstructionTypeNum::fload_0 => InstructionInfo::fload(0),
        InstructionTypeNum::fload_1 => InstructionInfo::fload(1),
        InstructionTypeNum::fload_2 => InstructionInfo::fload(2),
        InstructionTypeNum::fload_3 => InstructionInfo::fload(3),
        InstructionTypeNum::fstore => InstructionInfo::fstore(c.read_u8()? as u16),
        InstructionTypeNum::fstore_0 => InstructionInfo::fstore(0),
        InstructionTypeNum::fstore_1 => InstructionInfo::fstore(1),
        InstructionTypeNum::fstore_2 => InstructionInfo::fstore(2),
        InstructionTypeNum::fstore_3 => InstructionInfo::fstore(3),
        InstructionTypeNum::iload => InstructionInfo::iload(c.read_u8()? as u16),
        InstructionTypeNum::iload_0 => InstructionInfo::iload(0),
        InstructionTypeNum::iload_1 => InstructionInfo::iload(1),
        InstructionTypeNum::iload_2 => InstructionInfo::iload(2),
        InstructionTypeNum::iload_3 => InstructionInfo::iload(3),
        InstructionTypeNum::istore => InstructionInfo::istore(c.read_u8()? as u16),
        InstructionTypeNum::istore_0 => InstructionInfo::istore(0),
        InstructionTypeNum::istore_1 => InstructionInfo::istore(1),
        InstructionTypeNum::istore_2 => InstructionInfo::istore(2),
        InstructionTypeNum::istore_3 => InstructionInfo::istore(3),
        InstructionTypeNum::lload => InstructionInfo::lload(c.read_u8()? as u16),
        InstructionTypeNum::lload_0 => InstructionInfo::lload(0),
        InstructionTypeNum::lload_1 => InstructionInfo::lload(1),
        InstructionTypeNum::lload_2 => InstructionInfo::lload(2),
        InstructionTypeNum::lload_3 => InstructionInfo::lload(3),
        InstructionTypeNum::lstore => InstructionInfo::lstore(c.read_u8()? as u16),
        InstructionTypeNum::lstore_0 => InstructionInfo::lstore(0),
        InstructionTypeNum::lstore_1 => InstructionInfo::lstore(1),
        InstructionTypeNum::lstore_2 => InstructionInfo::lstore(2),
        InstructionTypeNum::lstore_3 => InstructionInfo::lstore(3),
        InstructionTypeNum::iconst_m1 => InstructionInfo::iconst(-1),
        InstructionTypeNum::iconst_0 => InstructionInfo::iconst(0),
        InstructionTypeNum::iconst_1 => InstructionInfo::iconst(1),
        InstructionTypeNum::iconst_2 => InstructionInfo::iconst(2),
        InstructionTypeNum::iconst_3 => InstructionInfo::iconst(3),
        InstructionTypeNum::iconst_4 => InstructionInfo::iconst(4),
        InstructionTypeNum::iconst_5 => InstructionInfo::iconst(5),
        InstructionTypeNum::lconst_0 => InstructionInfo::lconst(0),
        InstructionTypeNum::lconst_1 => InstructionInfo::lconst(1),
        InstructionTypeNum::fconst_0 => InstructionInfo::fconst(0.0),
        InstructionTypeNum::fconst_1 => InstructionInfo::fconst(1.0),
        InstructionTypeNum::fconst_2 => InstructionInfo::fconst(2.0),
        InstructionTypeNum::dconst_0 => InstructionInfo::dconst(0.0),
        InstructionTypeNum::dconst_1 => InstructionInfo::dconst(1.0),
        InstructionTypeNum::anewarray => InstructionInfo::anewarray(c.read_u16()?),
        InstructionTypeNum::checkcast => InstructionInfo::checkcast(c.read_u16()?),
        InstructionTypeNum::getfield => InstructionInfo::getfield(c.read_u16()?),
        InstructionTypeNum::getstatic => InstructionInfo::getstatic(c.read_u16()?),
        InstructionTypeNum::instanceof => InstructionInfo::instanceof(c.read_u16()?),
        InstructionTypeNum::invokespecial => InstructionInfo::invokespecial(c.read_u16()?),
        InstructionTypeNum::invokestatic => InstructionInfo::invokestatic(c.read_u16()?),
        InstructionTypeNum::invokevirtual => InstructionInfo::invokevirtual(c.read_u16()?),
        InstructionTypeNum::new => InstructionInfo::new(c.read_u16()?),
        InstructionTypeNum::putfield => InstructionInfo::putfield(c.read_u16()?),
        InstructionTypeNum::putstatic => InstructionInfo::putstatic(c.read_u16()?),
        InstructionTypeNum::ldc_w => InstructionInfo::ldc(c.read_u16()?),
        InstructionTypeNum::ldc2_w => InstructionInfo::ldc2_w(c.read_u16()?),
        InstructionTypeNum::ldc => InstructionInfo::ldc(c.read_u8()? as u16),
        InstructionTypeNum::goto_ => InstructionInfo::goto_(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::if_acmpeq => InstructionInfo::if_acmpeq(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::if_acmpne => InstructionInfo::if_acmpne(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::if_icmpeq => InstructionInfo::if_icmpeq(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::if_icmpne => InstructionInfo::if_icmpne(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::if_icmplt => InstructionInfo::if_icmplt(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::if_icmpge => InstructionInfo::if_icmpge(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::if_icmpgt => InstructionInfo::if_icmpgt(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::if_icmple => InstructionInfo::if_icmple(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::ifeq => InstructionInfo::ifeq(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::ifne => InstructionInfo::ifne(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::iflt => InstructionInfo::iflt(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::ifge => InstructionInfo::ifge(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::ifgt => InstructionInfo::ifgt(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::ifle => InstructionInfo::ifle(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::ifnonnull => InstructionInfo::ifnonnull(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::ifnull => InstructionInfo::ifnull(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::jsr => InstructionInfo::jsr(branch_target(start, c.read_i16()? as i32)?),
        InstructionTypeNum::goto_w => InstructionInfo::goto_(branch_target(start, c.read_i32()?)?),
        InstructionTypeNum::jsr_w => InstructionInfo::jsr(branch_target(start, c.read_i32()?)?),
        InstructionTypeNum::bipush => InstructionInfo::bipush(c.read_i8()?),
        InstructionTypeNum::sipush => InstructionInfo::sipush(c.read_i16()?),
        InstructionTypeNum::iinc => {
            let index = c.read_u8()? as u16;
            let const_ = c.read_i8()? as i16;
            InstructionInfo::iinc(IInc { index, const_ })
        }
        InstructionTypeNum::invokeinterface => {
            let index = c.read_u16()?;
            let count = c.read_u8()?;
            let _zero = c.read_u8()?;
            InstructionInfo::invokeinterface(InvokeInterface { index, count })
        }
        InstructionTypeNum::invokedynamic => {
            let index = c.read_u16()?;
            let _zeros = c.read_u16()?;
            InstructionInfo::invokedynamic(index)
        }
        InstructionTypeNum::multianewarray => {
            let index = c.read_u16()?;
            let dims = c.read_u8()?;
            InstructionInfo::multianewarray(MultiNewArray { index, dims })
        }
        InstructionTypeNum::newarray => {
            let atype = c.read_u8()?;
            InstructionInfo::newarray(Atype::from_u8(atype).ok_or_else(|| ClassfileReadError::Malformed(format!("bad newarray type {}", atype)))?)
        }
        InstructionTypeNum::ret => InstructionInfo::ret(c.read_u8()? as u16),
        InstructionTypeNum::tableswitch => InstructionInfo::tableswitch(read_table_switch(c, start)?),
        InstructionTypeNum::lookupswitch => InstructionInfo::lookupswitch(read_lookup_switch(c, start)?),
        InstructionTypeNum::wide => read_wide(c)?,
    })
}

/// Maps every branch operand of `instruction` through `remap`.
fn remap_targets(instruction: &mut InstructionInfo, remap: &impl Fn(u16) -> Result<InstructionIndex, ClassfileReadError>) -> Result<(), ClassfileReadError> {
    match instruction {
        InstructionInfo::goto_(target) |
        InstructionInfo::if_acmpeq(target) |
        InstructionInfo::if_acmpne(target) |
        InstructionInfo::if_icmpeq(target) |
        InstructionInfo::if_icmpne(target) |
        InstructionInfo::if_icmplt(target) |
        InstructionInfo::if_icmpge(target) |
        InstructionInfo::if_icmpgt(target) |
        InstructionInfo::if_icmple(target) |
        InstructionInfo::ifeq(target) |
        InstructionInfo::ifne(target) |
        InstructionInfo::iflt(target) |
        InstructionInfo::ifge(target) |
        InstructionInfo::ifgt(target) |
        InstructionInfo::ifle(target) |
        InstructionInfo::ifnonnull(target) |
        InstructionInfo::ifnull(target) |
        InstructionInfo::jsr(target) => {
            *target = remap(*target)?;
        }
        InstructionInfo::tableswitch(table_switch) => {
            table_switch.default = remap(table_switch.default)?;
            for target in table_switch.targets.iter_mut() {
                *target = remap(*target)?;
            }
        }
        InstructionInfo::lookupswitch(lookup_switch) => {
            lookup_switch.default = remap(lookup_switch.default)?;
            for (_, target) in lookup_switch.pairs.iter_mut() {
                *target = remap(*target)?;
            }
        }
        _ => {}
    }
    Ok(())
}

pub struct DecodedCode {
    pub instructions: Vec<InstructionInfo>,
    /// Byte offset of every instruction, by instruction index.
    pub offsets: Vec<usize>,
}

impl DecodedCode {
    /// `code_length` itself maps to one past the last instruction, for exception ranges.
    pub fn index_of(&self, byte_offset: usize, code_length: usize) -> Result<InstructionIndex, ClassfileReadError> {
        let index = if byte_offset == code_length {
            Ok(self.offsets.len())
        } else {
            self.offsets.binary_search(&byte_offset)
        };
        index.ok().and_then(|index| InstructionIndex::try_from(index).ok())
            .ok_or_else(|| ClassfileReadError::Malformed(format!("byte offset {} is not an instruction boundary", byte_offset)))
    }
}

/// Decodes a code attribute into a linear instruction list with branch operands as instruction indices.
pub fn parse_code_raw(raw: &[u8]) -> Result<DecodedCode, ClassfileReadError> {
    let mut c = CodeParserContext::new(raw);
    let mut instructions = vec![];
    let mut offsets = vec![];
    while c.offset < raw.len() {
        offsets.push(c.offset);
        instructions.push(parse_instruction(&mut c)?);
    }
    let mut res = DecodedCode { instructions, offsets };
    let mut instructions = std::mem::take(&mut res.instructions);
    for instruction in instructions.iter_mut() {
        remap_targets(instruction, &|byte_offset| res.index_of(byte_offset as usize, usize::MAX))?;
    }
    res.instructions = instructions;
    Ok(res)
}
