use loading::classpath::Classpath;
use rust_jvm_common::classnames::ClassName;

pub const DEFAULT_HEAP_SIZE: u64 = 64 * 1024 * 1024;

pub struct JVMOptions {
    pub(crate) main_class_name: ClassName,
    pub(crate) classpath: Classpath,
    pub(crate) heap_size: u64,
    pub(crate) trace_instructions: bool,
}

impl JVMOptions {
    pub fn new(main_class_name: ClassName, classpath: Classpath, heap_size: u64, trace_instructions: bool) -> Self {
        Self {
            main_class_name,
            classpath,
            heap_size,
            trace_instructions,
        }
    }

    pub fn main_class_name(&self) -> &ClassName {
        &self.main_class_name
    }
}
