use rust_jvm_common::java_values::JavaValue;

use crate::exceptions::Fault;
use crate::interpreter::PostInstructionAction;
use crate::stack_entry::StackEntry;

pub(crate) fn pop_category_1(current_frame: &mut StackEntry) -> Result<JavaValue, Fault> {
    let value = current_frame.pop()?;
    if value.is_category_2() {
        return Err(Fault::TypeMismatch { expected: "category 1 value", found: value });
    }
    Ok(value)
}

fn push_all(current_frame: &mut StackEntry, values: &[JavaValue]) -> Result<PostInstructionAction, Fault> {
    for value in values {
        current_frame.push(*value)?;
    }
    Ok(PostInstructionAction::Next)
}

pub fn dup(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value = pop_category_1(current_frame)?;
    push_all(current_frame, &[value, value])
}

pub fn dup_x1(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value1 = pop_category_1(current_frame)?;
    let value2 = pop_category_1(current_frame)?;
    push_all(current_frame, &[value1, value2, value1])
}

pub fn dup_x2(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value1 = pop_category_1(current_frame)?;
    let value2 = current_frame.pop()?;
    if value2.is_category_2() {
        return push_all(current_frame, &[value1, value2, value1]);
    }
    let value3 = pop_category_1(current_frame)?;
    push_all(current_frame, &[value1, value3, value2, value1])
}

pub fn dup2(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value1 = current_frame.pop()?;
    if value1.is_category_2() {
        return push_all(current_frame, &[value1, value1]);
    }
    let value2 = pop_category_1(current_frame)?;
    push_all(current_frame, &[value2, value1, value2, value1])
}

pub fn dup2_x1(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value1 = current_frame.pop()?;
    if value1.is_category_2() {
        let value2 = pop_category_1(current_frame)?;
        return push_all(current_frame, &[value1, value2, value1]);
    }
    let value2 = pop_category_1(current_frame)?;
    let value3 = pop_category_1(current_frame)?;
    push_all(current_frame, &[value2, value1, value3, value2, value1])
}

pub fn dup2_x2(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value1 = current_frame.pop()?;
    if value1.is_category_2() {
        let value2 = current_frame.pop()?;
        if value2.is_category_2() {
            return push_all(current_frame, &[value1, value2, value1]);
        }
        let value3 = pop_category_1(current_frame)?;
        return push_all(current_frame, &[value1, value3, value2, value1]);
    }
    let value2 = pop_category_1(current_frame)?;
    let value3 = current_frame.pop()?;
    if value3.is_category_2() {
        return push_all(current_frame, &[value2, value1, value3, value2, value1]);
    }
    let value4 = pop_category_1(current_frame)?;
    push_all(current_frame, &[value2, value1, value4, value3, value2, value1])
}

pub fn swap(current_frame: &mut StackEntry) -> Result<PostInstructionAction, Fault> {
    let value1 = pop_category_1(current_frame)?;
    let value2 = pop_category_1(current_frame)?;
    push_all(current_frame, &[value1, value2])
}
