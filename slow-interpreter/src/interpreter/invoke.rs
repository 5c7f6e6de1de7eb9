use std::sync::Arc;

use itertools::Itertools;
use log::{trace, warn};

use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::CPIndex;
use rust_jvm_common::java_values::JavaValue;
use rust_jvm_common::ptype::PrimitiveKind;
use runtime_class_stuff::{LinkError, RuntimeClass, RuntimeMethod};

use crate::class_loading::check_initing_or_inited_class;
use crate::exceptions::{Fault, InstructionError};
use crate::interpreter::load::kind_name;
use crate::interpreter::PostInstructionAction;
use crate::jvm_state::JVMState;
use crate::resolvers::{resolve_method, resolve_virtual};
use crate::stack_entry::StackEntry;

pub fn invoke_static(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let resolved = resolve_method(jvm, &current_frame.class, cp)?;
    if !resolved.method.is_static() {
        return Err(Fault::IncompatibleClassChange(format!("invokestatic of instance method {:?}", resolved.method)).into());
    }
    if let Some(init) = check_initing_or_inited_class(jvm, &resolved.class)? {
        return Ok(init);
    }
    setup_call(current_frame, resolved.class, resolved.method, false)
}

/// Constructors, private methods and superclass calls. Binds through the named class, never the receiver.
pub fn invoke_special(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let resolved = resolve_method(jvm, &current_frame.class, cp)?;
    if resolved.method.is_static() {
        return Err(Fault::IncompatibleClassChange(format!("invokespecial of static method {:?}", resolved.method)).into());
    }
    if let Some(init) = check_initing_or_inited_class(jvm, &resolved.class)? {
        return Ok(init);
    }
    setup_call(current_frame, resolved.class, resolved.method, true)
}

/// `invokevirtual` and `invokeinterface`: selects the implementation from the receiver's vtable.
pub fn invoke_virtual(jvm: &mut JVMState, current_frame: &mut StackEntry, cp: CPIndex) -> Result<PostInstructionAction, InstructionError> {
    let resolved = resolve_virtual(jvm, &current_frame.class, cp)?;
    let param_count = resolved.descriptor.parameter_types.len();
    if current_frame.stack_depth() < param_count + 1 {
        return Err(argument_count_fault(current_frame, format!("{}.{}", resolved.class_name, resolved.shape), param_count + 1, resolved.descriptor.jvm_representation()).into());
    }
    let receiver = current_frame.peek(param_count)?;
    let receiver = receiver.unwrap_object()
        .ok_or(Fault::TypeMismatch { expected: "reference", found: receiver })?
        .ok_or(Fault::NullPointer("method invocation"))?;
    let runtime_class = if jvm.memory.is_array(receiver)? {
        jvm.classes.load(&ClassName::object())?
    } else {
        let class_id = jvm.memory.class_id(receiver)?;
        jvm.classes.lookup_id(class_id).ok_or(LinkError::UnknownClassID(class_id))?
    };
    // final methods stay out of inheriting vtables and cannot be overridden
    let method = match runtime_class.lookup_virtual(&resolved.shape) {
        Ok(method) => method,
        Err(err) => runtime_class.methods.get(&resolved.shape).filter(|method| method.is_final()).cloned().ok_or(err)?,
    };
    let class = jvm.declaring_class(&runtime_class, &method)?;
    setup_call(current_frame, class, method, true)
}

fn argument_count_fault(current_frame: &StackEntry, method: String, expected: usize, expected_types: String) -> Fault {
    Fault::ArgumentCount {
        method,
        expected,
        expected_types,
        available: current_frame.stack_depth(),
        passed: current_frame.operand_stack().iter().join(", "),
    }
}

/// Operand stack form of a parameter kind.
fn stack_kind(kind: PrimitiveKind) -> PrimitiveKind {
    match kind {
        PrimitiveKind::Byte | PrimitiveKind::Boolean | PrimitiveKind::Short | PrimitiveKind::Char => PrimitiveKind::Int,
        PrimitiveKind::Array => PrimitiveKind::Reference,
        other => other,
    }
}

/// Pops the receiver and arguments into a new frame's locals, long and double taking two slots.
/// Native methods are stubbed: arguments are discarded and the return type's zero value is pushed.
fn setup_call(current_frame: &mut StackEntry, class: Arc<RuntimeClass>, method: Arc<RuntimeMethod>, has_receiver: bool) -> Result<PostInstructionAction, InstructionError> {
    let parameter_kinds = method.descriptor.parameter_types.iter().map(|ptype| ptype.kind()).collect_vec();
    let expected = parameter_kinds.len() + has_receiver as usize;
    if current_frame.stack_depth() < expected {
        return Err(argument_count_fault(current_frame, format!("{:?}", method), expected, method.descriptor.jvm_representation()).into());
    }
    let expected_kinds = has_receiver.then_some(PrimitiveKind::Reference).into_iter().chain(parameter_kinds.into_iter().map(stack_kind));
    for (i, kind) in expected_kinds.enumerate() {
        let arg = current_frame.peek(expected - 1 - i)?;
        if arg.kind() != kind {
            return Err(Fault::TypeMismatch { expected: kind_name(kind), found: arg }.into());
        }
    }
    let mut args = (0..expected).map(|_| current_frame.pop()).collect::<Result<Vec<_>, _>>()?;
    args.reverse();
    if method.is_native() {
        warn!("native method {:?} is not implemented, returning a zero value", method);
        if let Some(res) = JavaValue::default_value(method.descriptor.return_type.kind()) {
            current_frame.push(res)?;
        }
        return Ok(PostInstructionAction::Next);
    }
    if method.is_abstract() {
        return Err(Fault::AbstractMethod(format!("{:?}", method)).into());
    }
    let mut frame = StackEntry::new(class, method);
    let mut slot = 0;
    for arg in args {
        frame.local_set(slot, arg)?;
        slot += if arg.is_category_2() { 2 } else { 1 };
    }
    trace!("invoke {} with {} argument(s)", frame.method_display(), expected);
    Ok(PostInstructionAction::Call { frame })
}
