use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::CPIndex;
use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use runtime_class_stuff::LinkError;

use crate::exceptions::{Fault, InstructionError};
use crate::instance_of_common::{ARRAY_SUPERTYPES, is_assignable};
use crate::interpreter::PostInstructionAction;
use crate::jvm_state::JVMState;
use crate::stack_entry::StackEntry;

/// Runtime class name of `object` and whether it is assignable to `target`.
fn instance_of_impl(jvm: &mut JVMState, object: ObjectAddress, target: &ClassName) -> Result<(bool, ClassName), InstructionError> {
    if target.is_array() {
        return Err(Fault::Unsupported("type checks against array types").into());
    }
    if jvm.memory.is_array(object)? {
        let assignable = ARRAY_SUPERTYPES.iter().any(|name| *name == target.get_referred_name());
        return Ok((assignable, ClassName::new("<array>")));
    }
    let target_class = jvm.classes.load(target)?;
    let class_id = jvm.memory.class_id(object)?;
    let actual = jvm.classes.lookup_id(class_id).ok_or(LinkError::UnknownClassID(class_id))?;
    Ok((is_assignable(&target_class, &actual), actual.name.clone()))
}

pub fn instanceof(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let target = current_frame.class.constant_pool.class_name(cp)?;
    let res = match current_frame.pop_reference()? {
        None => false,
        Some(object) => instance_of_impl(jvm, object, &target)?.0,
    };
    current_frame.push(JavaValue::Int(res as i32))?;
    Ok(PostInstructionAction::Next)
}

/// Leaves the reference on the stack.
pub fn checkcast(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let target = current_frame.class.constant_pool.class_name(cp)?;
    let value = current_frame.peek(0)?;
    let object = value.unwrap_object().ok_or(Fault::TypeMismatch { expected: "reference", found: value })?;
    if let Some(object) = object {
        let (assignable, actual) = instance_of_impl(jvm, object, &target)?;
        if !assignable {
            return Err(Fault::ClassCast { from: actual, to: target }.into());
        }
    }
    Ok(PostInstructionAction::Next)
}

pub fn arraylength(jvm: &mut JVMState, current_frame: &mut StackEntry) -> Result<PostInstructionAction, InstructionError> {
    let array = current_frame.pop_reference()?.ok_or(Fault::NullPointer("arraylength"))?;
    let length = jvm.memory.array_length(array)?;
    current_frame.push(JavaValue::Int(length))?;
    Ok(PostInstructionAction::Next)
}

/// Single threaded, so monitors only null check their operand.
pub fn monitor(current_frame: &mut StackEntry, operation: &'static str) -> Result<PostInstructionAction, Fault> {
    current_frame.pop_reference()?.ok_or(Fault::NullPointer(operation))?;
    Ok(PostInstructionAction::Next)
}
