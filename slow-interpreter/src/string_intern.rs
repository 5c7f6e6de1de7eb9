use log::{trace, warn};

use loading::ClassLoadingError;
use rust_jvm_common::ClassID;
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use rust_jvm_common::ptype::PrimitiveKind;

use crate::exceptions::InstructionError;
use crate::jvm_state::JVMState;

/// The interned object for a string literal. Equal literals give the same reference.
///
/// With `java/lang/String` on the classpath this is an instance of it whose `value` field holds the
/// characters. Without one the bare `char[]` stands in for the string. String's static initializer
/// and constructor are never run.
pub fn intern_string(jvm: &mut JVMState, text: &str) -> Result<ObjectAddress, InstructionError> {
    let utf16 = text.encode_utf16().collect::<Vec<u16>>();
    if let Some(interned) = jvm.string_internment.get(&utf16) {
        return Ok(*interned);
    }
    let chars = char_array(jvm, &utf16)?;
    let res = match jvm.classes.load(&ClassName::string()) {
        Ok(string_class) => {
            let string = jvm.memory.allocate_object(string_class.id, string_class.field_group.instance_size, string_class.field_group.instance_slots())?;
            match string_class.field_group.get(&string_class.name, "value") {
                Some(value) if value.ptype.jvm_representation() == "[C" => {
                    jvm.memory.write_field(string, value.offset, value.kind, JavaValue::Object(Some(chars)))?;
                }
                _ => warn!("{} has no char[] value field, literal {:?} has no contents", string_class.name, text),
            }
            string
        }
        Err(ClassLoadingError::ClassNotFound(_)) => chars,
        Err(err) => return Err(err.into()),
    };
    trace!("interned {:?} at {}", text, res);
    jvm.string_internment.insert(utf16, res);
    Ok(res)
}

fn char_array(jvm: &mut JVMState, utf16: &[u16]) -> Result<ObjectAddress, InstructionError> {
    let array = jvm.memory.allocate_array(PrimitiveKind::Char, ClassID::PRIMITIVE_ARRAY, utf16.len() as i32)?;
    for (i, unit) in utf16.iter().enumerate() {
        jvm.memory.write_array_element(array, i as i32, PrimitiveKind::Char, JavaValue::Char(*unit))?;
    }
    Ok(array)
}

/// Characters of an interned literal, whichever representation it has.
pub fn string_contents(jvm: &JVMState, string: ObjectAddress) -> Option<String> {
    let chars = if jvm.memory.is_array(string).ok()? {
        string
    } else {
        let class = jvm.classes.lookup_id(jvm.memory.class_id(string).ok()?)?;
        let value = class.field_group.get(&class.name, "value").filter(|value| value.ptype.jvm_representation() == "[C")?;
        jvm.memory.read_field(string, value.offset, value.kind).ok()?.unwrap_object()??
    };
    let len = jvm.memory.array_length(chars).ok()?;
    let units = (0..len)
        .map(|i| match jvm.memory.read_array_element(chars, i, PrimitiveKind::Char) {
            Ok(JavaValue::Char(unit)) => Some(unit),
            _ => None,
        })
        .collect::<Option<Vec<u16>>>()?;
    String::from_utf16(&units).ok()
}
