use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use itertools::Itertools;
use parking_lot::RwLock;
use thiserror::Error;

use rust_jvm_common::ClassID;
use rust_jvm_common::classfile::{ACC_ABSTRACT, ACC_FINAL, ACC_INTERFACE, ACC_NATIVE, ACC_PRIVATE, ACC_STATIC, Classfile, ConstantPool, ConstantPoolError, ExceptionTableElem, InstructionInfo};
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::descriptor_parser::{DescriptorError, MethodDescriptor};
use rust_jvm_common::java_values::ObjectAddress;
use rust_jvm_common::method_shape::MethodShape;

use crate::field_numbers::{FieldGroup, RuntimeField};
use crate::method_table::{declared_methods, non_virtual_methods, vtable};

pub mod field_numbers;
pub mod method_table;
pub mod class_registry;

pub const CLINIT: &str = "<clinit>";
pub const INIT: &str = "<init>";

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum LinkError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    ConstantPool(#[from] ConstantPoolError),
    #[error("method {shape} not found in {class}")]
    MethodNotFound { class: ClassName, shape: MethodShape },
    #[error("field {field} not found in {class}")]
    FieldNotFound { class: ClassName, field: String },
    #[error("no class with id {0}")]
    UnknownClassID(ClassID),
    #[error("{class} linked as {found} but the next free id is {expected}")]
    IdOutOfOrder { class: ClassName, expected: ClassID, found: ClassID },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClassStatus {
    PREPARED,
    INITIALIZED,
}

#[derive(Debug, Copy, Clone)]
pub struct ClassState {
    pub status: ClassStatus,
    pub static_base: Option<ObjectAddress>,
}

pub struct RuntimeMethod {
    pub name: String,
    pub desc_str: String,
    pub descriptor: MethodDescriptor,
    pub access_flags: u16,
    pub max_stack: u16,
    pub max_locals: u16,
    /// Empty for native and abstract methods.
    pub instructions: Vec<InstructionInfo>,
    pub exception_table: Vec<ExceptionTableElem>,
    pub declaring_class: ClassID,
    pub declaring_class_name: ClassName,
}

impl RuntimeMethod {
    pub fn shape(&self) -> MethodShape {
        MethodShape::new(self.name.as_str(), self.desc_str.as_str())
    }

    pub fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC > 0
    }

    pub fn is_native(&self) -> bool {
        self.access_flags & ACC_NATIVE > 0
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT > 0
    }

    pub fn is_final(&self) -> bool {
        self.access_flags & ACC_FINAL > 0
    }

    pub fn is_private(&self) -> bool {
        self.access_flags & ACC_PRIVATE > 0
    }
}

impl Debug for RuntimeMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}{}", self.declaring_class_name, self.name, self.desc_str)
    }
}

pub struct RuntimeClass {
    pub id: ClassID,
    pub name: ClassName,
    pub access_flags: u16,
    pub parent: Option<Arc<RuntimeClass>>,
    pub interfaces: Vec<Arc<RuntimeClass>>,
    pub field_group: FieldGroup,
    /// Declared methods plus inherited non-private ones, minus constructors and static initializers.
    pub methods: HashMap<MethodShape, Arc<RuntimeMethod>>,
    pub vtable: HashMap<MethodShape, Arc<RuntimeMethod>>,
    pub constant_pool: ConstantPool,
    state: RwLock<ClassState>,
}

impl RuntimeClass {
    /// Links a parsed class against its already linked superclass and interfaces.
    pub fn link(id: ClassID, classfile: &Classfile, parent: Option<Arc<RuntimeClass>>, interfaces: Vec<Arc<RuntimeClass>>) -> Result<Self, LinkError> {
        let name = classfile.class_name()?;
        let field_group = FieldGroup::new(&name, classfile, parent.as_ref().map(|parent| &parent.field_group))?;
        let declared = declared_methods(id, &name, classfile)?;
        let methods = non_virtual_methods(&declared, parent.as_deref());
        let vtable = vtable(&declared, parent.as_deref(), interfaces.as_slice());
        Ok(Self {
            id,
            name,
            access_flags: classfile.access_flags,
            parent,
            interfaces,
            field_group,
            methods,
            vtable,
            constant_pool: classfile.constant_pool.clone(),
            state: RwLock::new(ClassState { status: ClassStatus::PREPARED, static_base: None }),
        })
    }

    pub fn status(&self) -> ClassStatus {
        self.state.read().status
    }

    pub fn set_status(&self, status: ClassStatus) {
        self.state.write().status = status;
    }

    pub fn static_base(&self) -> Option<ObjectAddress> {
        self.state.read().static_base
    }

    pub fn set_static_base(&self, static_base: ObjectAddress) {
        self.state.write().static_base = Some(static_base);
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE > 0
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT > 0
    }

    /// The static initializer declared by this class itself, never an inherited one.
    pub fn clinit(&self) -> Option<Arc<RuntimeMethod>> {
        self.methods.get(&MethodShape::new(CLINIT, "()V")).filter(|method| method.declaring_class == self.id).cloned()
    }

    pub fn lookup_method(&self, shape: &MethodShape) -> Result<Arc<RuntimeMethod>, LinkError> {
        self.methods.get(shape).cloned().ok_or_else(|| LinkError::MethodNotFound { class: self.name.clone(), shape: shape.clone() })
    }

    pub fn lookup_virtual(&self, shape: &MethodShape) -> Result<Arc<RuntimeMethod>, LinkError> {
        self.vtable.get(shape).cloned().ok_or_else(|| LinkError::MethodNotFound { class: self.name.clone(), shape: shape.clone() })
    }

    /// Superclass chain starting with this class.
    pub fn ancestors(self: &Arc<Self>) -> impl Iterator<Item=Arc<RuntimeClass>> {
        std::iter::successors(Some(self.clone()), |class| class.parent.clone())
    }

    /// Static fields declared here, in layout order, with their constant pool initial values.
    pub fn own_static_fields(&self) -> Vec<&RuntimeField> {
        self.field_group.static_fields_declared_by(&self.name)
    }
}

impl Debug for RuntimeClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeClass")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|parent| parent.name.clone()))
            .field("interfaces", &self.interfaces.iter().map(|interface| interface.name.clone()).collect_vec())
            .field("instance_size", &self.field_group.instance_size)
            .field("static_size", &self.field_group.static_size)
            .finish()
    }
}

/// Looks a field up along the superclass chain, then through the interface closure.
/// Returns the class that declares it.
pub fn resolve_field(class: &Arc<RuntimeClass>, field_name: &str) -> Option<(Arc<RuntimeClass>, RuntimeField)> {
    for ancestor in class.ancestors() {
        if let Some(field) = ancestor.field_group.get(&ancestor.name, field_name) {
            return Some((ancestor.clone(), field.clone()));
        }
    }
    for ancestor in class.ancestors() {
        for interface in interface_closure(&ancestor) {
            if let Some(field) = interface.field_group.get(&interface.name, field_name) {
                return Some((interface.clone(), field.clone()));
            }
        }
    }
    None
}

/// Breadth first over declared interfaces and their superinterfaces, each visited once.
pub fn interface_closure(class: &RuntimeClass) -> Vec<Arc<RuntimeClass>> {
    let mut res: Vec<Arc<RuntimeClass>> = vec![];
    let mut queue: std::collections::VecDeque<Arc<RuntimeClass>> = class.interfaces.iter().cloned().collect();
    while let Some(interface) = queue.pop_front() {
        if res.iter().any(|seen| seen.id == interface.id) {
            continue;
        }
        queue.extend(interface.interfaces.iter().cloned());
        res.push(interface);
    }
    res
}
