use rust_jvm_common::java_values::JavaValue;
use rust_jvm_common::ptype::PrimitiveKind;

use crate::exceptions::{Fault, InstructionError};
use crate::interpreter::load::{checked_array_index, kind_name};
use crate::interpreter::PostInstructionAction;
use crate::jvm_state::JVMState;
use crate::stack_entry::StackEntry;

pub fn store_local(current_frame: &mut StackEntry, index: u16, kind: PrimitiveKind) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.pop()?;
    let value = value.narrow_to(kind).ok_or(Fault::TypeMismatch { expected: kind_name(kind), found: value })?;
    current_frame.local_set(index, value)?;
    Ok(PostInstructionAction::Next)
}

pub fn iinc(current_frame: &mut StackEntry, index: u16, const_: i16) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.local_get(index)?;
    let int = value.unwrap_int().ok_or(Fault::TypeMismatch { expected: "int", found: value })?;
    current_frame.local_set(index, JavaValue::Int(int.wrapping_add(const_ as i32)))?;
    Ok(PostInstructionAction::Next)
}

/// `iastore`, `bastore` and friends. Ints are truncated to the element width.
pub fn array_store(jvm: &mut JVMState, current_frame: &mut StackEntry, elem_kind: PrimitiveKind) -> Result<PostInstructionAction, InstructionError> {
    let value = current_frame.pop()?;
    let value = value.narrow_to(elem_kind).ok_or(Fault::TypeMismatch { expected: kind_name(elem_kind), found: value })?;
    let index = current_frame.pop_int()?;
    let arrayref = current_frame.pop_reference()?;
    let array = checked_array_index(jvm, arrayref, index, "array store")?;
    jvm.memory.write_array_element(array, index, elem_kind, value)?;
    Ok(PostInstructionAction::Next)
}
