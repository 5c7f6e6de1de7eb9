use std::sync::Arc;

use rust_jvm_common::CPIndex;
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::descriptor_parser::{MethodDescriptor, parse_method_descriptor};
use rust_jvm_common::method_shape::MethodShape;
use runtime_class_stuff::{LinkError, resolve_field, RuntimeClass, RuntimeMethod};
use runtime_class_stuff::field_numbers::RuntimeField;

use crate::exceptions::InstructionError;
use crate::jvm_state::JVMState;

/// A method reference bound through the named class's non-virtual table.
#[derive(Clone)]
pub struct ResolvedMethod {
    pub class: Arc<RuntimeClass>,
    pub method: Arc<RuntimeMethod>,
}

/// What a virtual or interface call site needs before it sees its receiver.
#[derive(Clone)]
pub struct ResolvedVirtual {
    pub class_name: ClassName,
    pub shape: MethodShape,
    pub descriptor: MethodDescriptor,
}

#[derive(Clone)]
pub struct ResolvedField {
    /// Class declaring the field.
    pub class: Arc<RuntimeClass>,
    pub field: RuntimeField,
}

pub fn resolve_method(jvm: &mut JVMState, current: &RuntimeClass, cp: CPIndex) -> Result<ResolvedMethod, InstructionError> {
    if let Some(resolved) = jvm.resolved_methods.get(&(current.id, cp)) {
        return Ok(resolved.clone());
    }
    let member = current.constant_pool.member_ref(cp)?;
    let class = jvm.classes.load(&member.class_name)?;
    let method = class.lookup_method(&MethodShape::new(member.name, member.descriptor))?;
    let class = jvm.declaring_class(&class, &method)?;
    let resolved = ResolvedMethod { class, method };
    jvm.resolved_methods.insert((current.id, cp), resolved.clone());
    Ok(resolved)
}

pub fn resolve_virtual(jvm: &mut JVMState, current: &RuntimeClass, cp: CPIndex) -> Result<ResolvedVirtual, InstructionError> {
    if let Some(resolved) = jvm.resolved_virtuals.get(&(current.id, cp)) {
        return Ok(resolved.clone());
    }
    let member = current.constant_pool.member_ref(cp)?;
    let descriptor = parse_method_descriptor(member.descriptor.as_str()).map_err(LinkError::from)?;
    let resolved = ResolvedVirtual {
        class_name: member.class_name,
        shape: MethodShape::new(member.name, member.descriptor),
        descriptor,
    };
    jvm.resolved_virtuals.insert((current.id, cp), resolved.clone());
    Ok(resolved)
}

pub fn resolve_field_ref(jvm: &mut JVMState, current: &RuntimeClass, cp: CPIndex) -> Result<ResolvedField, InstructionError> {
    if let Some(resolved) = jvm.resolved_fields.get(&(current.id, cp)) {
        return Ok(resolved.clone());
    }
    let member = current.constant_pool.member_ref(cp)?;
    let class = jvm.classes.load(&member.class_name)?;
    let (class, field) = resolve_field(&class, member.name.as_str())
        .ok_or_else(|| LinkError::FieldNotFound { class: member.class_name.clone(), field: member.name.clone() })?;
    let resolved = ResolvedField { class, field };
    jvm.resolved_fields.insert((current.id, cp), resolved.clone());
    Ok(resolved)
}
