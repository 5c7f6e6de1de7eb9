use std::cmp::Ordering;

use rust_jvm_common::java_values::JavaValue;

use crate::exceptions::Fault;
use crate::interpreter::PostInstructionAction;
use crate::stack_entry::StackEntry;

fn ordering_to_int(ordering: Option<Ordering>, nan_result: i32) -> i32 {
    match ordering {
        Some(Ordering::Less) => -1,
        Some(Ordering::Equal) => 0,
        Some(Ordering::Greater) => 1,
        None => nan_result,
    }
}

pub fn lcmp(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_long()?;
    let value1 = current_frame.pop_long()?;
    current_frame.push(JavaValue::Int(ordering_to_int(Some(value1.cmp(&value2)), 0)))?;
    Ok(PostInstructionAction::Next)
}

/// `fcmpl` when `nan_result` is -1, `fcmpg` when it is 1.
pub fn fcmp(current_frame: &mut StackEntry, nan_result: i32) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_float()?;
    let value1 = current_frame.pop_float()?;
    current_frame.push(JavaValue::Int(ordering_to_int(value1.partial_cmp(&value2), nan_result)))?;
    Ok(PostInstructionAction::Next)
}

pub fn dcmp(current_frame: &mut StackEntry, nan_result: i32) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_double()?;
    let value1 = current_frame.pop_double()?;
    current_frame.push(JavaValue::Int(ordering_to_int(value1.partial_cmp(&value2), nan_result)))?;
    Ok(PostInstructionAction::Next)
}
