use std::sync::Arc;

use log::{debug, warn};

use rust_jvm_common::classfile::ConstantKind;
use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use runtime_class_stuff::{ClassStatus, RuntimeClass};

use crate::exceptions::{Fault, InstructionError};
use crate::interpreter::PostInstructionAction;
use crate::jvm_state::JVMState;
use crate::stack_entry::StackEntry;

/// Marks `class` and its uninitialized superclasses initialized and prepares their static storage.
/// Returns the static initializer frames to push, the class's own first, so the root-most superclass runs first.
pub fn initialize_class(jvm: &mut JVMState, class: &Arc<RuntimeClass>) -> Result<Vec<StackEntry>, InstructionError> {
    let mut frames = vec![];
    for current in class.ancestors() {
        if current.status() == ClassStatus::INITIALIZED {
            break;
        }
        current.set_status(ClassStatus::INITIALIZED);
        static_storage(jvm, &current)?;
        debug!("initializing {}", current.name);
        if let Some(clinit) = current.clinit() {
            frames.push(StackEntry::new(current.clone(), clinit));
        }
    }
    Ok(frames)
}

/// `None` when the class may be used right away, otherwise the action that runs its initializers
/// before the current instruction executes again.
pub fn check_initing_or_inited_class(jvm: &mut JVMState, class: &Arc<RuntimeClass>) -> Result<Option<PostInstructionAction>, InstructionError> {
    let frames = initialize_class(jvm, class)?;
    Ok(if frames.is_empty() {
        None
    } else {
        Some(PostInstructionAction::InitClass { frames })
    })
}

/// The class's static block, allocated with ConstantValue initial values on first request.
pub fn static_storage(jvm: &mut JVMState, class: &RuntimeClass) -> Result<ObjectAddress, InstructionError> {
    if let Some(static_base) = class.static_base() {
        return Ok(static_base);
    }
    let own_statics = class.own_static_fields();
    let static_base = jvm.memory.allocate_object(class.id, class.field_group.static_size, own_statics.iter().map(|field| (field.offset, field.kind)))?;
    class.set_static_base(static_base);
    for field in own_statics {
        let cp_index = match field.constant_value {
            None => continue,
            Some(cp_index) => cp_index,
        };
        let value = match class.constant_pool.get(cp_index)? {
            ConstantKind::Integer(i) => JavaValue::Int(*i),
            ConstantKind::Float(f) => JavaValue::Float(*f),
            ConstantKind::Long(l) => JavaValue::Long(*l),
            ConstantKind::Double(d) => JavaValue::Double(*d),
            other => {
                let kind: &'static str = other.into();
                warn!("{}.{} keeps its zero value, {} constants are not materialized", class.name, field.name, kind);
                continue;
            }
        };
        let value = value.narrow_to(field.kind).ok_or(Fault::TypeMismatch { expected: "constant matching the field type", found: value })?;
        jvm.memory.write_field(static_base, field.offset, field.kind, value)?;
    }
    Ok(static_base)
}
