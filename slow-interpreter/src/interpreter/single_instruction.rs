use log::trace;

use rust_jvm_common::classfile::InstructionInfo;
use rust_jvm_common::java_values::JavaValue;
use rust_jvm_common::ptype::PrimitiveKind;

use crate::exceptions::{Fault, InstructionError};
use crate::interpreter::arithmetic::*;
use crate::interpreter::branch::{goto_, if_acmp, if_icmp, if_zero, ifnonnull, ifnull};
use crate::interpreter::cmp::{dcmp, fcmp, lcmp};
use crate::interpreter::consts::{aconst_null, push_constant};
use crate::interpreter::conversion::*;
use crate::interpreter::dup::{dup, dup2, dup2_x1, dup2_x2, dup_x1, dup_x2, swap};
use crate::interpreter::fields::{getfield, getstatic, putfield, putstatic};
use crate::interpreter::invoke::{invoke_special, invoke_static, invoke_virtual};
use crate::interpreter::ldc::{ldc, ldc2_w};
use crate::interpreter::load::{array_load, load_local};
use crate::interpreter::new::{anewarray, new, newarray};
use crate::interpreter::pop::{pop, pop2};
use crate::interpreter::PostInstructionAction;
use crate::interpreter::special::{arraylength, checkcast, instanceof, monitor};
use crate::interpreter::store::{array_store, iinc, store_local};
use crate::interpreter::switch::{lookupswitch, tableswitch};
use crate::jvm_state::JVMState;
use crate::stack_entry::StackEntry;

pub fn run_single_instruction(jvm: &mut JVMState, current_frame: &mut StackEntry) -> Result<PostInstructionAction, InstructionError> {
    let method = current_frame.method.clone();
    let instruction = method.instructions.get(current_frame.pc as usize)
        .ok_or(Fault::FellOffEnd { pc: current_frame.pc, instruction_count: current_frame.instruction_count() })?;
    if jvm.trace_instructions {
        trace!("{} @ {}: {:?}", current_frame.method_display(), current_frame.pc, instruction);
    }
    Ok(match instruction {
        InstructionInfo::nop => PostInstructionAction::Next,
        InstructionInfo::aconst_null => aconst_null(current_frame)?,
        InstructionInfo::iconst(i) => push_constant(current_frame, JavaValue::Int(*i))?,
        InstructionInfo::lconst(l) => push_constant(current_frame, JavaValue::Long(*l))?,
        InstructionInfo::fconst(f) => push_constant(current_frame, JavaValue::Float(*f))?,
        InstructionInfo::dconst(d) => push_constant(current_frame, JavaValue::Double(*d))?,
        InstructionInfo::bipush(b) => push_constant(current_frame, JavaValue::Int(*b as i32))?,
        InstructionInfo::sipush(s) => push_constant(current_frame, JavaValue::Int(*s as i32))?,
        InstructionInfo::ldc(cp) => ldc(jvm, current_frame, *cp)?,
        InstructionInfo::ldc2_w(cp) => ldc2_w(current_frame, *cp)?,

        InstructionInfo::iload(i) => load_local(current_frame, *i, PrimitiveKind::Int)?,
        InstructionInfo::lload(i) => load_local(current_frame, *i, PrimitiveKind::Long)?,
        InstructionInfo::fload(i) => load_local(current_frame, *i, PrimitiveKind::Float)?,
        InstructionInfo::dload(i) => load_local(current_frame, *i, PrimitiveKind::Double)?,
        InstructionInfo::aload(i) => load_local(current_frame, *i, PrimitiveKind::Reference)?,
        InstructionInfo::iaload => array_load(jvm, current_frame, PrimitiveKind::Int)?,
        InstructionInfo::laload => array_load(jvm, current_frame, PrimitiveKind::Long)?,
        InstructionInfo::faload => array_load(jvm, current_frame, PrimitiveKind::Float)?,
        InstructionInfo::daload => array_load(jvm, current_frame, PrimitiveKind::Double)?,
        InstructionInfo::aaload => array_load(jvm, current_frame, PrimitiveKind::Reference)?,
        InstructionInfo::baload => array_load(jvm, current_frame, PrimitiveKind::Byte)?,
        InstructionInfo::caload => array_load(jvm, current_frame, PrimitiveKind::Char)?,
        InstructionInfo::saload => array_load(jvm, current_frame, PrimitiveKind::Short)?,

        InstructionInfo::istore(i) => store_local(current_frame, *i, PrimitiveKind::Int)?,
        InstructionInfo::lstore(i) => store_local(current_frame, *i, PrimitiveKind::Long)?,
        InstructionInfo::fstore(i) => store_local(current_frame, *i, PrimitiveKind::Float)?,
        InstructionInfo::dstore(i) => store_local(current_frame, *i, PrimitiveKind::Double)?,
        InstructionInfo::astore(i) => store_local(current_frame, *i, PrimitiveKind::Reference)?,
        InstructionInfo::iastore => array_store(jvm, current_frame, PrimitiveKind::Int)?,
        InstructionInfo::lastore => array_store(jvm, current_frame, PrimitiveKind::Long)?,
        InstructionInfo::fastore => array_store(jvm, current_frame, PrimitiveKind::Float)?,
        InstructionInfo::dastore => array_store(jvm, current_frame, PrimitiveKind::Double)?,
        InstructionInfo::aastore => array_store(jvm, current_frame, PrimitiveKind::Reference)?,
        InstructionInfo::bastore => array_store(jvm, current_frame, PrimitiveKind::Byte)?,
        InstructionInfo::castore => array_store(jvm, current_frame, PrimitiveKind::Char)?,
        InstructionInfo::sastore => array_store(jvm, current_frame, PrimitiveKind::Short)?,
        InstructionInfo::iinc(iinc_) => iinc(current_frame, iinc_.index, iinc_.const_)?,

        InstructionInfo::pop => pop(current_frame)?,
        InstructionInfo::pop2 => pop2(current_frame)?,
        InstructionInfo::dup => dup(current_frame)?,
        InstructionInfo::dup_x1 => dup_x1(current_frame)?,
        InstructionInfo::dup_x2 => dup_x2(current_frame)?,
        InstructionInfo::dup2 => dup2(current_frame)?,
        InstructionInfo::dup2_x1 => dup2_x1(current_frame)?,
        InstructionInfo::dup2_x2 => dup2_x2(current_frame)?,
        InstructionInfo::swap => swap(current_frame)?,

        InstructionInfo::iadd => iadd(current_frame)?,
        InstructionInfo::isub => isub(current_frame)?,
        InstructionInfo::imul => imul(current_frame)?,
        InstructionInfo::idiv => idiv(current_frame)?,
        InstructionInfo::irem => irem(current_frame)?,
        InstructionInfo::ineg => ineg(current_frame)?,
        InstructionInfo::iand => iand(current_frame)?,
        InstructionInfo::ior => ior(current_frame)?,
        InstructionInfo::ixor => ixor(current_frame)?,
        InstructionInfo::ishl => ishl(current_frame)?,
        InstructionInfo::ishr => ishr(current_frame)?,
        InstructionInfo::iushr => iushr(current_frame)?,
        InstructionInfo::ladd => ladd(current_frame)?,
        InstructionInfo::lsub => lsub(current_frame)?,
        InstructionInfo::lmul => lmul(current_frame)?,
        InstructionInfo::ldiv => ldiv(current_frame)?,
        InstructionInfo::lrem => lrem(current_frame)?,
        InstructionInfo::lneg => lneg(current_frame)?,
        InstructionInfo::land => land(current_frame)?,
        InstructionInfo::lor => lor(current_frame)?,
        InstructionInfo::lxor => lxor(current_frame)?,
        InstructionInfo::lshl => lshl(current_frame)?,
        InstructionInfo::lshr => lshr(current_frame)?,
        InstructionInfo::lushr => lushr(current_frame)?,
        InstructionInfo::fadd => fadd(current_frame)?,
        InstructionInfo::fsub => fsub(current_frame)?,
        InstructionInfo::fmul => fmul(current_frame)?,
        InstructionInfo::fdiv => fdiv(current_frame)?,
        InstructionInfo::frem => frem(current_frame)?,
        InstructionInfo::fneg => fneg(current_frame)?,
        InstructionInfo::dadd => dadd(current_frame)?,
        InstructionInfo::dsub => dsub(current_frame)?,
        InstructionInfo::dmul => dmul(current_frame)?,
        InstructionInfo::ddiv => ddiv(current_frame)?,
        InstructionInfo::drem => drem(current_frame)?,
        InstructionInfo::dneg => dneg(current_frame)?,

        InstructionInfo::i2l => i2l(current_frame)?,
        InstructionInfo::i2f => i2f(current_frame)?,
        InstructionInfo::i2d => i2d(current_frame)?,
        InstructionInfo::i2b => i2b(current_frame)?,
        InstructionInfo::i2c => i2c(current_frame)?,
        InstructionInfo::i2s => i2s(current_frame)?,
        InstructionInfo::l2i => l2i(current_frame)?,
        InstructionInfo::l2f => l2f(current_frame)?,
        InstructionInfo::l2d => l2d(current_frame)?,
        InstructionInfo::f2i => f2i(current_frame)?,
        InstructionInfo::f2l => f2l(current_frame)?,
        InstructionInfo::f2d => f2d(current_frame)?,
        InstructionInfo::d2i => d2i(current_frame)?,
        InstructionInfo::d2l => d2l(current_frame)?,
        InstructionInfo::d2f => d2f(current_frame)?,

        InstructionInfo::lcmp => lcmp(current_frame)?,
        InstructionInfo::fcmpl => fcmp(current_frame, -1)?,
        InstructionInfo::fcmpg => fcmp(current_frame, 1)?,
        InstructionInfo::dcmpl => dcmp(current_frame, -1)?,
        InstructionInfo::dcmpg => dcmp(current_frame, 1)?,

        InstructionInfo::ifeq(target) => if_zero(current_frame, *target, |value| value == 0)?,
        InstructionInfo::ifne(target) => if_zero(current_frame, *target, |value| value != 0)?,
        InstructionInfo::iflt(target) => if_zero(current_frame, *target, |value| value < 0)?,
        InstructionInfo::ifge(target) => if_zero(current_frame, *target, |value| value >= 0)?,
        InstructionInfo::ifgt(target) => if_zero(current_frame, *target, |value| value > 0)?,
        InstructionInfo::ifle(target) => if_zero(current_frame, *target, |value| value <= 0)?,
        InstructionInfo::if_icmpeq(target) => if_icmp(current_frame, *target, |value1, value2| value1 == value2)?,
        InstructionInfo::if_icmpne(target) => if_icmp(current_frame, *target, |value1, value2| value1 != value2)?,
        InstructionInfo::if_icmplt(target) => if_icmp(current_frame, *target, |value1, value2| value1 < value2)?,
        InstructionInfo::if_icmpge(target) => if_icmp(current_frame, *target, |value1, value2| value1 >= value2)?,
        InstructionInfo::if_icmpgt(target) => if_icmp(current_frame, *target, |value1, value2| value1 > value2)?,
        InstructionInfo::if_icmple(target) => if_icmp(current_frame, *target, |value1, value2| value1 <= value2)?,
        InstructionInfo::if_acmpeq(target) => if_acmp(current_frame, *target, true)?,
        InstructionInfo::if_acmpne(target) => if_acmp(current_frame, *target, false)?,
        InstructionInfo::ifnull(target) => ifnull(current_frame, *target)?,
        InstructionInfo::ifnonnull(target) => ifnonnull(current_frame, *target)?,
        InstructionInfo::goto_(target) => goto_(current_frame, *target)?,
        InstructionInfo::tableswitch(switch) => tableswitch(current_frame, switch)?,
        InstructionInfo::lookupswitch(switch) => lookupswitch(current_frame, switch)?,

        InstructionInfo::ireturn => PostInstructionAction::Return { res: Some(JavaValue::Int(current_frame.pop_int()?)) },
        InstructionInfo::lreturn => PostInstructionAction::Return { res: Some(JavaValue::Long(current_frame.pop_long()?)) },
        InstructionInfo::freturn => PostInstructionAction::Return { res: Some(JavaValue::Float(current_frame.pop_float()?)) },
        InstructionInfo::dreturn => PostInstructionAction::Return { res: Some(JavaValue::Double(current_frame.pop_double()?)) },
        InstructionInfo::areturn => PostInstructionAction::Return { res: Some(JavaValue::Object(current_frame.pop_reference()?)) },
        InstructionInfo::return_ => PostInstructionAction::Return { res: None },

        InstructionInfo::getstatic(cp) => getstatic(jvm, current_frame, *cp)?,
        InstructionInfo::putstatic(cp) => putstatic(jvm, current_frame, *cp)?,
        InstructionInfo::getfield(cp) => getfield(jvm, current_frame, *cp)?,
        InstructionInfo::putfield(cp) => putfield(jvm, current_frame, *cp)?,
        InstructionInfo::invokevirtual(cp) => invoke_virtual(jvm, current_frame, *cp)?,
        InstructionInfo::invokeinterface(invoke) => invoke_virtual(jvm, current_frame, invoke.index)?,
        InstructionInfo::invokespecial(cp) => invoke_special(jvm, current_frame, *cp)?,
        InstructionInfo::invokestatic(cp) => invoke_static(jvm, current_frame, *cp)?,
        InstructionInfo::new(cp) => new(jvm, current_frame, *cp)?,
        InstructionInfo::newarray(atype) => newarray(jvm, current_frame, *atype)?,
        InstructionInfo::anewarray(cp) => anewarray(jvm, current_frame, *cp)?,
        InstructionInfo::arraylength => arraylength(jvm, current_frame)?,
        InstructionInfo::checkcast(cp) => checkcast(jvm, current_frame, *cp)?,
        InstructionInfo::instanceof(cp) => instanceof(jvm, current_frame, *cp)?,
        InstructionInfo::monitorenter => monitor(current_frame, "monitorenter")?,
        InstructionInfo::monitorexit => monitor(current_frame, "monitorexit")?,

        InstructionInfo::athrow => return Err(Fault::Unsupported("athrow").into()),
        InstructionInfo::invokedynamic(_) => return Err(Fault::Unsupported("invokedynamic").into()),
        InstructionInfo::multianewarray(_) => return Err(Fault::Unsupported("multianewarray").into()),
        InstructionInfo::jsr(_) => return Err(Fault::Unsupported("jsr").into()),
        InstructionInfo::ret(_) => return Err(Fault::Unsupported("ret").into()),
    })
}
