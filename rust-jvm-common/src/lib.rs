#[macro_use]
extern crate num_derive;

use std::fmt::{Display, Formatter};

pub mod classfile;
pub mod ptype;
pub mod classnames;
pub mod test_utils;
pub mod descriptor_parser;
pub mod loading;
pub mod method_shape;
pub mod java_values;

pub const EXPECTED_CLASSFILE_MAGIC: u32 = 0xCAFEBABE;

/// Index into a class's constant pool.
pub type CPIndex = u16;

/// Absolute index into a method's decoded instruction list.
pub type InstructionIndex = u16;

/// Process-unique id of a linked class. `ClassID(0)` is never handed out and marks primitive arrays.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ClassID(pub u32);

impl ClassID {
    pub const PRIMITIVE_ARRAY: ClassID = ClassID(0);
    pub const FIRST: ClassID = ClassID(1);
}

impl Display for ClassID {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
