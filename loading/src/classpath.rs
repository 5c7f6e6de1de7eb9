use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use rust_jvm_common::classnames::{CLASS_FILE_SUFFIX, ClassName};

pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, Clone)]
pub struct Classpath {
    /// Base directories, searched in order.
    pub classpath_base: Vec<Box<Path>>,
    pub max_depth: usize,
}

impl Classpath {
    pub fn from_roots(roots: impl IntoIterator<Item=PathBuf>) -> Self {
        Self {
            classpath_base: roots.into_iter().map(|root| root.into_boxed_path()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// First class file below any root whose path relative to that root matches `name`.
    pub fn lookup(&self, name: &ClassName) -> Option<PathBuf> {
        let expected = name.to_relative_path();
        self.classpath_base.iter().find_map(|root| {
            WalkDir::new(root)
                .min_depth(1)
                .max_depth(self.max_depth)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file() && entry.path().extension().map(|extension| extension == CLASS_FILE_SUFFIX).unwrap_or(false))
                .find(|entry| pathdiff::diff_paths(entry.path(), root).map(|relative| relative == expected).unwrap_or(false))
                .map(|entry| entry.into_path())
        })
    }
}
