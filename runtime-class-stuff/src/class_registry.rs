use std::collections::HashMap;
use std::sync::Arc;

use rust_jvm_common::ClassID;
use rust_jvm_common::classnames::ClassName;

use crate::{LinkError, RuntimeClass};

/// Owns every linked class for the life of the run, by name and by id.
/// Not synchronized: a registry belongs to a single thread of control.
pub struct ClassRegistry {
    by_id: Vec<Arc<RuntimeClass>>,
    by_name: HashMap<ClassName, Arc<RuntimeClass>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self { by_id: vec![], by_name: HashMap::new() }
    }

    /// The id the next registered class must carry.
    pub fn next_id(&self) -> ClassID {
        ClassID(ClassID::FIRST.0 + self.by_id.len() as u32)
    }

    /// Ids are dense, so a class linked against a stale `next_id` is refused.
    pub fn register(&mut self, class: Arc<RuntimeClass>) -> Result<Arc<RuntimeClass>, LinkError> {
        let expected = self.next_id();
        if class.id != expected {
            return Err(LinkError::IdOutOfOrder { class: class.name.clone(), expected, found: class.id });
        }
        self.by_id.push(class.clone());
        self.by_name.insert(class.name.clone(), class.clone());
        Ok(class)
    }

    pub fn get_by_name(&self, name: &ClassName) -> Option<Arc<RuntimeClass>> {
        self.by_name.get(name).cloned()
    }

    pub fn get_by_id(&self, id: ClassID) -> Option<Arc<RuntimeClass>> {
        let index = id.0.checked_sub(ClassID::FIRST.0)?;
        self.by_id.get(index as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
