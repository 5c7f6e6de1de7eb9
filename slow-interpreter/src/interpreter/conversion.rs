use rust_jvm_common::java_values::JavaValue;

use crate::exceptions::Fault;
use crate::interpreter::PostInstructionAction;
use crate::stack_entry::StackEntry;

// float to integer casts saturate and map NaN to zero, as the JVM requires

pub fn i2l(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let int = current_frame.pop_int()?;
    current_frame.push(JavaValue::Long(int as i64))?;
    Ok(PostInstructionAction::Next)
}

pub fn i2f(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let int = current_frame.pop_int()?;
    current_frame.push(JavaValue::Float(int as f32))?;
    Ok(PostInstructionAction::Next)
}

pub fn i2d(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let int = current_frame.pop_int()?;
    current_frame.push(JavaValue::Double(int as f64))?;
    Ok(PostInstructionAction::Next)
}

pub fn i2b(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let int = current_frame.pop_int()?;
    current_frame.push(JavaValue::Int(int as i8 as i32))?;
    Ok(PostInstructionAction::Next)
}

pub fn i2c(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let int = current_frame.pop_int()?;
    current_frame.push(JavaValue::Int(int as u16 as i32))?;
    Ok(PostInstructionAction::Next)
}

pub fn i2s(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let int = current_frame.pop_int()?;
    current_frame.push(JavaValue::Int(int as i16 as i32))?;
    Ok(PostInstructionAction::Next)
}

pub fn l2i(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let long = current_frame.pop_long()?;
    current_frame.push(JavaValue::Int(long as i32))?;
    Ok(PostInstructionAction::Next)
}

pub fn l2f(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let long = current_frame.pop_long()?;
    current_frame.push(JavaValue::Float(long as f32))?;
    Ok(PostInstructionAction::Next)
}

pub fn l2d(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let long = current_frame.pop_long()?;
    current_frame.push(JavaValue::Double(long as f64))?;
    Ok(PostInstructionAction::Next)
}

pub fn f2i(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let float = current_frame.pop_float()?;
    current_frame.push(JavaValue::Int(float as i32))?;
    Ok(PostInstructionAction::Next)
}

pub fn f2l(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let float = current_frame.pop_float()?;
    current_frame.push(JavaValue::Long(float as i64))?;
    Ok(PostInstructionAction::Next)
}

pub fn f2d(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let float = current_frame.pop_float()?;
    current_frame.push(JavaValue::Double(float as f64))?;
    Ok(PostInstructionAction::Next)
}

pub fn d2i(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let double = current_frame.pop_double()?;
    current_frame.push(JavaValue::Int(double as i32))?;
    Ok(PostInstructionAction::Next)
}

pub fn d2l(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let double = current_frame.pop_double()?;
    current_frame.push(JavaValue::Long(double as i64))?;
    Ok(PostInstructionAction::Next)
}

pub fn d2f(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let double = current_frame.pop_double()?;
    current_frame.push(JavaValue::Float(double as f32))?;
    Ok(PostInstructionAction::Next)
}
