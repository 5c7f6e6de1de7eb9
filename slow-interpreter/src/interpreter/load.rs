use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use rust_jvm_common::ptype::PrimitiveKind;

use crate::exceptions::{Fault, InstructionError};
use crate::interpreter::PostInstructionAction;
use crate::jvm_state::JVMState;
use crate::stack_entry::StackEntry;

/// Pushes local `index` after checking it holds a `kind` value. Narrow kinds are stored as ints.
pub fn load_local(current_frame: &mut StackEntry, index: u16, kind: PrimitiveKind) -> Result<PostInstructionAction, Fault> {
    let value = current_frame.local_get(index)?;
    let matches = match kind {
        PrimitiveKind::Int => value.unwrap_int().is_some(),
        PrimitiveKind::Long => value.unwrap_long().is_some(),
        PrimitiveKind::Float => value.unwrap_float().is_some(),
        PrimitiveKind::Double => value.unwrap_double().is_some(),
        _ => value.unwrap_object().is_some(),
    };
    if !matches {
        return Err(Fault::TypeMismatch { expected: kind_name(kind), found: value });
    }
    current_frame.push(value)?;
    Ok(PostInstructionAction::Next)
}

pub(crate) fn kind_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Byte => "byte",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Short => "short",
        PrimitiveKind::Char => "char",
        PrimitiveKind::Int => "int",
        PrimitiveKind::Float => "float",
        PrimitiveKind::Long => "long",
        PrimitiveKind::Double => "double",
        PrimitiveKind::Reference | PrimitiveKind::Array => "reference",
        PrimitiveKind::Void => "void",
    }
}

/// Null and bounds checks shared by array loads and stores.
pub(crate) fn checked_array_index(jvm: &JVMState, arrayref: Option<ObjectAddress>, index: i32, operation: &'static str) -> Result<ObjectAddress, InstructionError> {
    let array = arrayref.ok_or(Fault::NullPointer(operation))?;
    let length = jvm.memory.array_length(array)?;
    if index < 0 || index >= length {
        return Err(Fault::ArrayIndexOutOfBounds { index, length }.into());
    }
    Ok(array)
}

/// `iaload`, `baload` and friends. The loaded element is widened for the operand stack.
pub fn array_load(jvm: &mut JVMState, current_frame: &mut StackEntry, elem_kind: PrimitiveKind) -> Result<PostInstructionAction, InstructionError> {
    let index = current_frame.pop_int()?;
    let arrayref = current_frame.pop_reference()?;
    let array = checked_array_index(jvm, arrayref, index, "array load")?;
    let value: JavaValue = jvm.memory.read_array_element(array, index, elem_kind)?;
    current_frame.push(value.to_stack_value())?;
    Ok(PostInstructionAction::Next)
}
