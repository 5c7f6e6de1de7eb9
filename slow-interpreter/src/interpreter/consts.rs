use rust_jvm_common::java_values::JavaValue;

use crate::exceptions::Fault;
use crate::interpreter::PostInstructionAction;
use crate::stack_entry::StackEntry;

pub fn aconst_null(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    current_frame.push(JavaValue::null())?;
    Ok(PostInstructionAction::Next)
}

/// Covers the iconst/lconst/fconst/dconst families as well as bipush and sipush.
pub fn push_constant(current_frame: &mut StackEntry, value: JavaValue) -> Result<PostInstructionAction, Fault> {
    current_frame.push(value)?;
    Ok(PostInstructionAction::Next)
}
