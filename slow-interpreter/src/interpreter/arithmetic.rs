use rust_jvm_common::java_values::JavaValue;

use crate::exceptions::Fault;
use crate::interpreter::PostInstructionAction;
use crate::stack_entry::StackEntry;

fn int_binary(current_frame: &mut StackEntry, op: impl FnOnce(i32, i32) -> Result<i32, Fault>) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_int()?;
    let value1 = current_frame.pop_int()?;
    current_frame.push(JavaValue::Int(op(value1, value2)?))?;
    Ok(PostInstructionAction::Next)
}

fn long_binary(current_frame: &mut StackEntry, op: impl FnOnce(i64, i64) -> Result<i64, Fault>) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_long()?;
    let value1 = current_frame.pop_long()?;
    current_frame.push(JavaValue::Long(op(value1, value2)?))?;
    Ok(PostInstructionAction::Next)
}

fn float_binary(current_frame: &mut StackEntry, op: impl FnOnce(f32, f32) -> f32) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_float()?;
    let value1 = current_frame.pop_float()?;
    current_frame.push(JavaValue::Float(op(value1, value2)))?;
    Ok(PostInstructionAction::Next)
}

fn double_binary(current_frame: &mut StackEntry, op: impl FnOnce(f64, f64) -> f64) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_double()?;
    let value1 = current_frame.pop_double()?;
    current_frame.push(JavaValue::Double(op(value1, value2)))?;
    Ok(PostInstructionAction::Next)
}

/// The shift distance is an int even for long shifts.
fn long_shift(current_frame: &mut StackEntry, op: impl FnOnce(i64, u32) -> i64) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_int()?;
    let value1 = current_frame.pop_long()?;
    current_frame.push(JavaValue::Long(op(value1, (value2 & 0x3f) as u32)))?;
    Ok(PostInstructionAction::Next)
}

pub fn iadd(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(value1.wrapping_add(value2)))
}

pub fn isub(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(value1.wrapping_sub(value2)))
}

pub fn imul(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(value1.wrapping_mul(value2)))
}

pub fn idiv(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| {
        if value2 == 0 {
            return Err(Fault::DivisionByZero);
        }
        Ok(value1.wrapping_div(value2))
    })
}

pub fn irem(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| {
        if value2 == 0 {
            return Err(Fault::DivisionByZero);
        }
        Ok(value1.wrapping_rem(value2))
    })
}

pub fn ineg(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop_int()?;
    current_frame.push(JavaValue::Int(value.wrapping_neg()))?;
    Ok(PostInstructionAction::Next)
}

pub fn iand(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(value1 & value2))
}

pub fn ior(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(value1 | value2))
}

pub fn ixor(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(value1 ^ value2))
}

pub fn ishl(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(value1.wrapping_shl((value2 & 0x1f) as u32)))
}

pub fn ishr(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(value1.wrapping_shr((value2 & 0x1f) as u32)))
}

pub fn iushr(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    int_binary(current_frame, |value1, value2| Ok(((value1 as u32) >> (value2 & 0x1f)) as i32))
}

pub fn ladd(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_binary(current_frame, |value1, value2| Ok(value1.wrapping_add(value2)))
}

pub fn lsub(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_binary(current_frame, |value1, value2| Ok(value1.wrapping_sub(value2)))
}

pub fn lmul(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_binary(current_frame, |value1, value2| Ok(value1.wrapping_mul(value2)))
}

pub fn ldiv(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_binary(current_frame, |value1, value2| {
        if value2 == 0 {
            return Err(Fault::DivisionByZero);
        }
        Ok(value1.wrapping_div(value2))
    })
}

pub fn lrem(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_binary(current_frame, |value1, value2| {
        if value2 == 0 {
            return Err(Fault::DivisionByZero);
        }
        Ok(value1.wrapping_rem(value2))
    })
}

pub fn lneg(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop_long()?;
    current_frame.push(JavaValue::Long(value.wrapping_neg()))?;
    Ok(PostInstructionAction::Next)
}

pub fn land(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_binary(current_frame, |value1, value2| Ok(value1 & value2))
}

pub fn lor(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_binary(current_frame, |value1, value2| Ok(value1 | value2))
}

pub fn lxor(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_binary(current_frame, |value1, value2| Ok(value1 ^ value2))
}

pub fn lshl(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_shift(current_frame, |value1, distance| value1.wrapping_shl(distance))
}

pub fn lshr(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_shift(current_frame, |value1, distance| value1.wrapping_shr(distance))
}

pub fn lushr(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    long_shift(current_frame, |value1, distance| ((value1 as u64) >> distance) as i64)
}

pub fn fadd(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    float_binary(current_frame, |value1, value2| value1 + value2)
}

pub fn fsub(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    float_binary(current_frame, |value1, value2| value1 - value2)
}

pub fn fmul(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    float_binary(current_frame, |value1, value2| value1 * value2)
}

pub fn fdiv(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    float_binary(current_frame, |value1, value2| value1 / value2)
}

pub fn frem(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    float_binary(current_frame, |value1, value2| value1 % value2)
}

pub fn fneg(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop_float()?;
    current_frame.push(JavaValue::Float(-value))?;
    Ok(PostInstructionAction::Next)
}

pub fn dadd(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    double_binary(current_frame, |value1, value2| value1 + value2)
}

pub fn dsub(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    double_binary(current_frame, |value1, value2| value1 - value2)
}

pub fn dmul(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    double_binary(current_frame, |value1, value2| value1 * value2)
}

pub fn ddiv(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    double_binary(current_frame, |value1, value2| value1 / value2)
}

pub fn drem(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    double_binary(current_frame, |value1, value2| value1 % value2)
}

pub fn dneg(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop_double()?;
    current_frame.push(JavaValue::Double(-value))?;
    Ok(PostInstructionAction::Next)
}
