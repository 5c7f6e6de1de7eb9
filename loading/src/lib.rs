use std::collections::HashMap;
use std::sync::Arc;

use classfile_parser::ClassfileParser;
use log::debug;
use thiserror::Error;

use rust_jvm_common::ClassID;
use rust_jvm_common::classfile::{Classfile, ConstantPoolError};
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::loading::{ClassfileReader, ClassfileReadError};
use runtime_class_stuff::{LinkError, RuntimeClass};
use runtime_class_stuff::class_registry::ClassRegistry;

use crate::classpath::Classpath;

pub mod classpath;

#[derive(Debug, Error)]
pub enum ClassLoadingError {
    #[error("class {0} not found on the classpath")]
    ClassNotFound(ClassName),
    #[error("malformed class {class}: {source}")]
    Malformed { class: ClassName, #[source] source: ClassfileReadError },
    #[error("class {expected} was found but declares itself as {found}")]
    NameMismatch { expected: ClassName, found: ClassName },
    #[error("class circularity involving {0}")]
    ClassCircularity(ClassName),
    #[error("array class {0} has no class file")]
    ArrayClass(ClassName),
    #[error(transparent)]
    ConstantPool(#[from] ConstantPoolError),
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Where parsed class descriptions come from.
pub trait ClassSource {
    fn find_classfile(&self, name: &ClassName) -> Result<Classfile, ClassLoadingError>;
}

pub struct ClasspathClassSource<R: ClassfileReader> {
    pub classpath: Classpath,
    pub reader: R,
}

impl ClasspathClassSource<ClassfileParser> {
    pub fn new(classpath: Classpath) -> Self {
        Self { classpath, reader: ClassfileParser }
    }
}

impl<R: ClassfileReader> ClassSource for ClasspathClassSource<R> {
    fn find_classfile(&self, name: &ClassName) -> Result<Classfile, ClassLoadingError> {
        let path = self.classpath.lookup(name).ok_or_else(|| ClassLoadingError::ClassNotFound(name.clone()))?;
        self.reader.read_classfile(&path).map_err(|source| ClassLoadingError::Malformed { class: name.clone(), source })
    }
}

/// Already parsed classes held in memory.
#[derive(Default)]
pub struct InMemoryClassSource {
    classes: HashMap<ClassName, Classfile>,
}

impl InMemoryClassSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, classfile: Classfile) -> Result<(), ConstantPoolError> {
        self.classes.insert(classfile.class_name()?, classfile);
        Ok(())
    }
}

impl ClassSource for InMemoryClassSource {
    fn find_classfile(&self, name: &ClassName) -> Result<Classfile, ClassLoadingError> {
        self.classes.get(name).cloned().ok_or_else(|| ClassLoadingError::ClassNotFound(name.clone()))
    }
}

pub struct ClassLoader {
    source: Box<dyn ClassSource>,
    registry: ClassRegistry,
    loading: Vec<ClassName>,
}

impl ClassLoader {
    pub fn new(source: Box<dyn ClassSource>, registry: ClassRegistry) -> Self {
        Self { source, registry, loading: vec![] }
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn lookup_id(&self, id: ClassID) -> Option<Arc<RuntimeClass>> {
        self.registry.get_by_id(id)
    }

    /// Returns the registered class, or loads and links it after its superclass and interfaces.
    pub fn load(&mut self, name: &ClassName) -> Result<Arc<RuntimeClass>, ClassLoadingError> {
        if let Some(class) = self.registry.get_by_name(name) {
            return Ok(class);
        }
        if name.is_array() {
            return Err(ClassLoadingError::ArrayClass(name.clone()));
        }
        if self.loading.contains(name) {
            return Err(ClassLoadingError::ClassCircularity(name.clone()));
        }
        self.loading.push(name.clone());
        let res = self.load_impl(name);
        self.loading.pop();
        res
    }

    fn load_impl(&mut self, name: &ClassName) -> Result<Arc<RuntimeClass>, ClassLoadingError> {
        let classfile = self.source.find_classfile(name)?;
        let found = classfile.class_name()?;
        if &found != name {
            return Err(ClassLoadingError::NameMismatch { expected: name.clone(), found });
        }
        let parent = match classfile.super_class_name()? {
            None => None,
            Some(super_name) => Some(self.load(&super_name)?),
        };
        let interfaces = classfile.interface_names()?.iter()
            .map(|interface| self.load(interface))
            .collect::<Result<Vec<_>, _>>()?;
        let id = self.registry.next_id();
        let class = RuntimeClass::link(id, &classfile, parent, interfaces)?;
        debug!("loaded {} as {} (instance size {}, static size {})", name, id, class.field_group.instance_size, class.field_group.static_size);
        Ok(self.registry.register(Arc::new(class))?)
    }
}
