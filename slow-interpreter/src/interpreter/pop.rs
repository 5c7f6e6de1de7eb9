use crate::exceptions::Fault;
use crate::interpreter::dup::pop_category_1;
use crate::interpreter::PostInstructionAction;
use crate::stack_entry::StackEntry;

pub fn pop(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    pop_category_1(current_frame)?;
    Ok(PostInstructionAction::Next)
}

/// One long or double, or two category 1 values.
pub fn pop2(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop()?;
    if !value.is_category_2() {
        pop_category_1(current_frame)?;
    }
    Ok(PostInstructionAction::Next)
}
