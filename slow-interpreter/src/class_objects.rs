use log::trace;

use loading::ClassLoadingError;
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::java_values::ObjectAddress;

use crate::exceptions::InstructionError;
use crate::jvm_state::JVMState;

/// The single object standing for `class_name` at runtime, created on first request.
///
/// Non-array classes are loaded first. The object is a `java/lang/Class` instance when that class is
/// on the classpath and a plain `java/lang/Object` otherwise.
pub fn get_or_create_class_object(jvm: &mut JVMState, class_name: &ClassName) -> Result<ObjectAddress, InstructionError> {
    if let Some(class_object) = jvm.class_objects.get(class_name) {
        return Ok(*class_object);
    }
    if !class_name.is_array() {
        jvm.classes.load(class_name)?;
    }
    let mirror_class = match jvm.classes.load(&ClassName::new("java/lang/Class")) {
        Ok(class) => class,
        Err(ClassLoadingError::ClassNotFound(_)) => jvm.classes.load(&ClassName::object())?,
        Err(err) => return Err(err.into()),
    };
    let class_object = jvm.memory.allocate_object(mirror_class.id, mirror_class.field_group.instance_size, mirror_class.field_group.instance_slots())?;
    trace!("class object for {} at {}", class_name, class_object);
    jvm.class_objects.insert(class_name.clone(), class_object);
    Ok(class_object)
}
