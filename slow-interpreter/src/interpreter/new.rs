use log::trace;

use rust_jvm_common::classfile::Atype;
use rust_jvm_common::{ClassID, CPIndex};
use rust_jvm_common::java_values::JavaValue;
use rust_jvm_common::ptype::PrimitiveKind;

use crate::class_loading::check_initing_or_inited_class;
use crate::exceptions::{Fault, InstructionError};
use crate::interpreter::PostInstructionAction;
use crate::jvm_state::JVMState;
use crate::stack_entry::StackEntry;

pub fn new(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let class_name = current_frame.class.constant_pool.class_name(cp)?;
    let class = jvm.classes.load(&class_name)?;
    if let Some(init) = check_initing_or_inited_class(jvm, &class)? {
        return Ok(init);
    }
    if class.is_interface() || class.is_abstract() {
        return Err(Fault::Instantiation(class_name).into());
    }
    let object = jvm.memory.allocate_object(class.id, class.field_group.instance_size, class.field_group.instance_slots())?;
    trace!("new {} at {}", class.name, object);
    current_frame.push(JavaValue::Object(Some(object)))?;
    Ok(PostInstructionAction::Next)
}

fn pop_count(current_frame: &mut StackEntry) -> Result<i32, Fault> {
    let count = current_frame.pop_int()?;
    if count < 0 {
        return Err(Fault::NegativeArraySize(count));
    }
    Ok(count)
}

pub fn newarray(jvm: &mut JVMState, current_frame: &mut StackEntry, atype: Atype) -> Result<PostInstructionAction, InstructionError> {
    let count = pop_count(current_frame)?;
    let array = jvm.memory.allocate_array(atype.kind(), ClassID::PRIMITIVE_ARRAY, count)?;
    current_frame.push(JavaValue::Object(Some(array)))?;
    Ok(PostInstructionAction::Next)
}

/// The header carries the element class id. Arrays of arrays use the primitive array id.
pub fn anewarray(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let elem_name = current_frame.class.constant_pool.class_name(cp)?;
    let (elem_kind, class_id) = if elem_name.is_array() {
        (PrimitiveKind::Array, ClassID::PRIMITIVE_ARRAY)
    } else {
        (PrimitiveKind::Reference, jvm.classes.load(&elem_name)?.id)
    };
    let count = pop_count(current_frame)?;
    let array = jvm.memory.allocate_array(elem_kind, class_id, count)?;
    current_frame.push(JavaValue::Object(Some(array)))?;
    Ok(PostInstructionAction::Next)
}
