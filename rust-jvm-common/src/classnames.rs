use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const CLASS_FILE_SUFFIX: &str = "class";

/// A class name in internal form (`java/lang/Object`).
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ClassName(String);

impl ClassName {
    pub fn new(str_: &str) -> Self {
        ClassName(str_.to_string())
    }

    /// Accepts a binary name (`java.lang.Object`) as found on the command line.
    pub fn from_binary_name(binary_name: &str) -> Self {
        ClassName(binary_name.replace('.', "/"))
    }

    pub fn object() -> Self {
        ClassName::new("java/lang/Object")
    }

    pub fn string() -> Self {
        ClassName::new("java/lang/String")
    }

    pub fn get_referred_name(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_array(&self) -> bool {
        self.0.starts_with('[')
    }

    /// Relative path of this class below a classpath root.
    pub fn to_relative_path(&self) -> PathBuf {
        let mut res: PathBuf = self.0.split('/').collect();
        res.set_extension(CLASS_FILE_SUFFIX);
        res
    }
}

impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ClassName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
