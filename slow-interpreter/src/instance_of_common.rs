use std::sync::Arc;

use runtime_class_stuff::{interface_closure, RuntimeClass};

/// Class names every array is assignable to.
pub const ARRAY_SUPERTYPES: [&str; 3] = ["java/lang/Object", "java/lang/Cloneable", "java/io/Serializable"];

/// Whether an instance of `actual` can be used where `target` is expected.
pub fn is_assignable(target: &RuntimeClass, actual: &Arc<RuntimeClass>) -> bool {
    if target.id == actual.id {
        return true;
    }
    actual.ancestors().any(|ancestor| {
        ancestor.id == target.id || interface_closure(&ancestor).iter().any(|interface| interface.id == target.id)
    })
}
