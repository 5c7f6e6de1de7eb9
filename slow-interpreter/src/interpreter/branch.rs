use rust_jvm_common::InstructionIndex;

use crate::exceptions::Fault;
use crate::interpreter::{jump_to, PostInstructionAction};
use crate::stack_entry::StackEntry;

fn branch_if(current_frame: &StackEntry, succeeds: bool, target: InstructionIndex) -> Result<PostInstructionAction, Fault> {
    if succeeds {
        jump_to(current_frame, target)
    } else {
        Ok(PostInstructionAction::Next)
    }
}

pub fn goto_(current_frame: &StackEntry, target: InstructionIndex) -> Result<PostInstructionAction, Fault> {
    jump_to(current_frame, target)
}

/// `ifeq` through `ifle`, comparing the popped int with zero.
pub fn if_zero(current_frame: &mut StackEntry, target: InstructionIndex, condition: impl FnOnce(i32) -> bool) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop_int()?;
    branch_if(current_frame, condition(value), target)
}

/// `if_icmpeq` through `if_icmple`.
pub fn if_icmp(current_frame: &mut StackEntry, target: InstructionIndex, condition: impl FnOnce(i32, i32) -> bool) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_int()?;
    let value1 = current_frame.pop_int()?;
    branch_if(current_frame, condition(value1, value2), target)
}

pub fn if_acmp(current_frame: &mut StackEntry, target: InstructionIndex, equal: bool) -> Result<PostInstructionAction, Fault> {
    let value2 = current_frame.pop_reference()?;
    let value1 = current_frame.pop_reference()?;
    branch_if(current_frame, (value1 == value2) == equal, target)
}

pub fn ifnull(current_frame: &mut StackEntry, target: InstructionIndex) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop_reference()?;
    branch_if(current_frame, value.is_none(), target)
}

pub fn ifnonnull(current_frame: &mut StackEntry, target: InstructionIndex) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop_reference()?;
    branch_if(current_frame, value.is_some(), target)
}
