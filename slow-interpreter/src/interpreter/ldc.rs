use rust_jvm_common::classfile::ConstantKind;
use rust_jvm_common::CPIndex;
use rust_jvm_common::java_values::JavaValue;

use crate::class_objects::get_or_create_class_object;
use crate::exceptions::{Fault, InstructionError};
use crate::interpreter::PostInstructionAction;
use crate::jvm_state::JVMState;
use crate::stack_entry::StackEntry;
use crate::string_intern::intern_string;

/// `ldc` and `ldc_w`: int, float, string and class constants.
pub fn ldc(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let value = match current_frame.class.constant_pool.get(cp)? {
        ConstantKind::Integer(i) => JavaValue::Int(*i),
        ConstantKind::Float(f) => JavaValue::Float(*f),
        ConstantKind::String { string_index } => {
            let text = current_frame.class.constant_pool.utf8(*string_index)?.to_string();
            JavaValue::Object(Some(intern_string(jvm, text.as_str())?))
        }
        ConstantKind::Class { .. } => {
            let class_name = current_frame.class.constant_pool.class_name(cp)?;
            JavaValue::Object(Some(get_or_create_class_object(jvm, &class_name)?))
        }
        ConstantKind::MethodType { .. } | ConstantKind::MethodHandle { .. } => return Err(Fault::Unsupported("ldc of a method handle or method type").into()),
        ConstantKind::Dynamic { .. } => return Err(Fault::Unsupported("ldc of a dynamic constant").into()),
        other => return Err(Fault::Unsupported(ldc_kind_name(other)).into()),
    };
    current_frame.push(value)?;
    Ok(PostInstructionAction::Next)
}

pub fn ldc2_w(current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let value = match current_frame.class.constant_pool.get(cp)? {
        ConstantKind::Long(l) => JavaValue::Long(*l),
        ConstantKind::Double(d) => JavaValue::Double(*d),
        ConstantKind::Dynamic { .. } => return Err(Fault::Unsupported("ldc2_w of a dynamic constant").into()),
        other => return Err(Fault::Unsupported(ldc_kind_name(other)).into()),
    };
    current_frame.push(value)?;
    Ok(PostInstructionAction::Next)
}

fn ldc_kind_name(constant: &ConstantKind) -> &'static str {
    match constant {
        ConstantKind::Long(_) | ConstantKind::Double(_) => "ldc of a wide constant",
        ConstantKind::Integer(_) | ConstantKind::Float(_) => "ldc2_w of a narrow constant",
        _ => "ldc of a non loadable constant",
    }
}
