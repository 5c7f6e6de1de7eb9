use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use log::info;

use loading::{ClassLoader, ClasspathClassSource};
use memory_manager::MemoryManager;
use rust_jvm_common::{ClassID, CPIndex};
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use rust_jvm_common::method_shape::MethodShape;
use rust_jvm_common::ptype::PrimitiveKind;
use runtime_class_stuff::{RuntimeClass, RuntimeMethod};
use runtime_class_stuff::class_registry::ClassRegistry;

use crate::class_loading::initialize_class;
use crate::exceptions::{ExecutionError, Fault};
use crate::interpreter::run_function_interpreted;
use crate::options::JVMOptions;
use crate::resolvers::{ResolvedField, ResolvedMethod, ResolvedVirtual};
use crate::stack_entry::{JavaStack, StackEntry};

pub const MAIN_NAME: &str = "main";
pub const MAIN_DESC: &str = "([Ljava/lang/String;)V";

pub struct JVMState {
    pub classes: ClassLoader,
    pub memory: MemoryManager,
    pub trace_instructions: bool,
    pub(crate) resolved_methods: HashMap<(ClassID, CPIndex), ResolvedMethod>,
    pub(crate) resolved_virtuals: HashMap<(ClassID, CPIndex), ResolvedVirtual>,
    pub(crate) resolved_fields: HashMap<(ClassID, CPIndex), ResolvedField>,
    /// Literal strings by UTF-16 contents.
    pub(crate) string_internment: HashMap<Vec<u16>, ObjectAddress>,
    pub(crate) class_objects: HashMap<ClassName, ObjectAddress>,
}

impl JVMState {
    pub fn new(classes: ClassLoader, memory: MemoryManager) -> Self {
        Self {
            classes,
            memory,
            trace_instructions: false,
            resolved_methods: HashMap::new(),
            resolved_virtuals: HashMap::new(),
            resolved_fields: HashMap::new(),
            string_internment: HashMap::new(),
            class_objects: HashMap::new(),
        }
    }

    pub fn from_options(options: JVMOptions) -> Self {
        let JVMOptions { classpath, heap_size, trace_instructions, .. } = options;
        let classes = ClassLoader::new(Box::new(ClasspathClassSource::new(classpath)), ClassRegistry::new());
        let mut jvm = Self::new(classes, MemoryManager::new(heap_size));
        jvm.trace_instructions = trace_instructions;
        jvm
    }

    /// Runs `main([Ljava/lang/String;)V` of the entry class with an empty argument array.
    pub fn execute(&mut self, main_class: &ClassName) -> Result<(), ExecutionError> {
        let class = self.classes.load(main_class)?;
        let main = class.lookup_method(&MethodShape::new(MAIN_NAME, MAIN_DESC))?;
        if !main.is_static() {
            return Err(ExecutionError::EntryNotStatic(format!("{:?}", main)));
        }
        let args = self.memory.allocate_array(PrimitiveKind::Reference, ClassID::PRIMITIVE_ARRAY, 0)?;
        let declaring = self.declaring_class(&class, &main)?;
        let mut main_frame = StackEntry::new(declaring, main);
        let mut stack = JavaStack::new();
        if let Err(fault) = main_frame.local_set(0, JavaValue::Object(Some(args))) {
            stack.push(main_frame);
            return Err(stack.frame_error(fault.into()));
        }
        stack.push(main_frame);
        // the entry class itself, not the declarer of an inherited main
        let init_frames = match initialize_class(self, &class) {
            Ok(frames) => frames,
            Err(err) => return Err(stack.frame_error(err)),
        };
        for frame in init_frames {
            stack.push(frame);
        }
        info!("running {}.{}{}", main_class, MAIN_NAME, MAIN_DESC);
        run_function_interpreted(self, &mut stack)?;
        Ok(())
    }

    /// Runs a single method to completion with the given arguments in its first locals.
    /// Classes are initialized by the instructions that use them, never by this call itself.
    pub fn run_method(&mut self, class: &Arc<RuntimeClass>, method: Arc<RuntimeMethod>, args: Vec<JavaValue>) -> Result<Option<JavaValue>, ExecutionError> {
        let declaring = self.declaring_class(class, &method)?;
        let expected = method.descriptor.parameter_types.len() + if method.is_static() { 0 } else { 1 };
        let mut stack = JavaStack::new();
        let mut frame = StackEntry::new(declaring, method);
        let res = Self::fill_args(&mut frame, args, expected);
        stack.push(frame);
        if let Err(fault) = res {
            return Err(stack.frame_error(fault.into()));
        }
        run_function_interpreted(self, &mut stack)
    }

    fn fill_args(frame: &mut StackEntry, args: Vec<JavaValue>, expected: usize) -> Result<(), Fault> {
        if args.len() != expected {
            return Err(Fault::ArgumentCount {
                method: frame.method_display(),
                expected,
                expected_types: frame.method.descriptor.jvm_representation(),
                available: args.len(),
                passed: args.iter().join(", "),
            });
        }
        let mut slot = 0;
        for arg in args {
            frame.local_set(slot, arg)?;
            slot += if arg.is_category_2() { 2 } else { 1 };
        }
        Ok(())
    }

    pub(crate) fn declaring_class(&self, class: &Arc<RuntimeClass>, method: &RuntimeMethod) -> Result<Arc<RuntimeClass>, runtime_class_stuff::LinkError> {
        if method.declaring_class == class.id {
            return Ok(class.clone());
        }
        self.classes.lookup_id(method.declaring_class).ok_or(runtime_class_stuff::LinkError::UnknownClassID(method.declaring_class))
    }
}
