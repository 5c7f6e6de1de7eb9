pub mod jvm_state;
pub mod options;
pub mod stack_entry;
pub mod exceptions;
pub mod interpreter;
pub mod class_loading;
pub mod instance_of_common;
pub mod resolvers;
pub mod string_intern;
pub mod class_objects;
