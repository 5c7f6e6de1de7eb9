use std::collections::HashMap;
use std::sync::Arc;

use rust_jvm_common::ClassID;
use rust_jvm_common::classfile::Classfile;
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::descriptor_parser::parse_method_descriptor;
use rust_jvm_common::method_shape::MethodShape;

use crate::{CLINIT, INIT, LinkError, RuntimeClass, RuntimeMethod};

pub fn declared_methods(id: ClassID, class_name: &ClassName, classfile: &Classfile) -> Result<Vec<Arc<RuntimeMethod>>, LinkError> {
    classfile.methods.iter().map(|method_info| {
        let name = classfile.constant_pool.utf8(method_info.name_index)?.to_string();
        let desc_str = classfile.constant_pool.utf8(method_info.descriptor_index)?.to_string();
        let descriptor = parse_method_descriptor(desc_str.as_str())?;
        let (max_stack, max_locals, instructions, exception_table) = match &method_info.code {
            Some(code) => (code.max_stack, code.max_locals, code.instructions.clone(), code.exception_table.clone()),
            None => (0, 0, vec![], vec![]),
        };
        Ok(Arc::new(RuntimeMethod {
            name,
            desc_str,
            descriptor,
            access_flags: method_info.access_flags,
            max_stack,
            max_locals,
            instructions,
            exception_table,
            declaring_class: id,
            declaring_class_name: class_name.clone(),
        }))
    }).collect()
}

fn is_special_name(method: &RuntimeMethod) -> bool {
    method.name == INIT || method.name == CLINIT
}

fn inheritable(method: &RuntimeMethod) -> bool {
    !(method.is_final() || method.is_static() || method.is_private() || is_special_name(method))
}

/// Declared methods, plus the parent's entries this class does not redeclare.
/// Constructors, static initializers and private methods are never inherited.
pub fn non_virtual_methods(declared: &[Arc<RuntimeMethod>], parent: Option<&RuntimeClass>) -> HashMap<MethodShape, Arc<RuntimeMethod>> {
    let mut res: HashMap<MethodShape, Arc<RuntimeMethod>> = declared.iter().map(|method| (method.shape(), method.clone())).collect();
    if let Some(parent) = parent {
        for (shape, method) in parent.methods.iter() {
            if is_special_name(method) || method.is_private() {
                continue;
            }
            res.entry(shape.clone()).or_insert_with(|| method.clone());
        }
    }
    res
}

/// Declared methods first. Inherited entries fill the gaps unless final, static or private.
/// Interface default methods come last, for shapes still unclaimed.
pub fn vtable(declared: &[Arc<RuntimeMethod>], parent: Option<&RuntimeClass>, interfaces: &[Arc<RuntimeClass>]) -> HashMap<MethodShape, Arc<RuntimeMethod>> {
    let mut res: HashMap<MethodShape, Arc<RuntimeMethod>> = declared.iter()
        .filter(|method| method.name != CLINIT)
        .map(|method| (method.shape(), method.clone()))
        .collect();
    if let Some(parent) = parent {
        for (shape, method) in parent.vtable.iter() {
            if inheritable(method) {
                res.entry(shape.clone()).or_insert_with(|| method.clone());
            }
        }
    }
    for interface in interfaces {
        for (shape, method) in interface.vtable.iter() {
            if inheritable(method) && !method.is_abstract() {
                res.entry(shape.clone()).or_insert_with(|| method.clone());
            }
        }
    }
    res
}
