use rust_jvm_common::CPIndex;

use crate::class_loading::{check_initing_or_inited_class, static_storage};
use crate::exceptions::{Fault, InstructionError};
use crate::interpreter::load::kind_name;
use crate::interpreter::PostInstructionAction;
use crate::jvm_state::JVMState;
use crate::resolvers::{resolve_field_ref, ResolvedField};
use crate::stack_entry::StackEntry;

fn resolve_static(jvm: &mut JVMState, current_frame: &StackEntry, cp: CPIndex) -> Result<ResolvedField, InstructionError> {
    let resolved = resolve_field_ref(jvm, &current_frame.class, cp)?;
    if !resolved.field.is_static() {
        return Err(Fault::IncompatibleClassChange(format!("{}.{} is not static", resolved.class.name, resolved.field.name)).into());
    }
    Ok(resolved)
}

fn resolve_instance(jvm: &mut JVMState, current_frame: &StackEntry, cp: CPIndex) -> Result<ResolvedField, InstructionError> {
    let resolved = resolve_field_ref(jvm, &current_frame.class, cp)?;
    if resolved.field.is_static() {
        return Err(Fault::IncompatibleClassChange(format!("{}.{} is static", resolved.class.name, resolved.field.name)).into());
    }
    Ok(resolved)
}

pub fn getstatic(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let ResolvedField { class, field } = resolve_static(jvm, current_frame, cp)?;
    if let Some(init) = check_initing_or_inited_class(jvm, &class)? {
        return Ok(init);
    }
    let static_base = static_storage(jvm, &class)?;
    let value = jvm.memory.read_field(static_base, field.offset, field.kind)?;
    current_frame.push(value)?;
    Ok(PostInstructionAction::Next)
}

pub fn putstatic(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let ResolvedField { class, field } = resolve_static(jvm, current_frame, cp)?;
    if let Some(init) = check_initing_or_inited_class(jvm, &class)? {
        return Ok(init);
    }
    let static_base = static_storage(jvm, &class)?;
    let value = current_frame.pop()?;
    let value = value.narrow_to(field.kind).ok_or(Fault::TypeMismatch { expected: kind_name(field.kind), found: value })?;
    jvm.memory.write_field(static_base, field.offset, field.kind, value)?;
    Ok(PostInstructionAction::Next)
}

pub fn getfield(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let ResolvedField { field, .. } = resolve_instance(jvm, current_frame, cp)?;
    let object = current_frame.pop_reference()?.ok_or(Fault::NullPointer("getfield"))?;
    let value = jvm.memory.read_field(object, field.offset, field.kind)?;
    current_frame.push(value)?;
    Ok(PostInstructionAction::Next)
}

pub fn putfield(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let ResolvedField { field, .. } = resolve_instance(jvm, current_frame, cp)?;
    let value = current_frame.pop()?;
    let value = value.narrow_to(field.kind).ok_or(Fault::TypeMismatch { expected: kind_name(field.kind), found: value })?;
    let object = current_frame.pop_reference()?.ok_or(Fault::NullPointer("putfield"))?;
    jvm.memory.write_field(object, field.offset, field.kind, value)?;
    Ok(PostInstructionAction::Next)
}
