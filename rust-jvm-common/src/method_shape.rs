use std::fmt::{Display, Formatter};

/// Name plus descriptor. Keys both the non-virtual method map and the vtable.
#[derive(Clone, Hash, Eq, PartialEq, Debug, Ord, PartialOrd)]
pub struct MethodShape {
    pub name: String,
    pub desc: String,
}

impl MethodShape {
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self { name: name.into(), desc: desc.into() }
    }
}

impl Display for MethodShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.desc)
    }
}
