use std::path::Path;

use thiserror::Error;

use crate::classfile::{Classfile, ConstantPoolError};

#[derive(Debug, Error)]
pub enum ClassfileReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("bad magic {0:#x}")]
    BadMagic(u32),
    #[error("unknown constant pool tag {tag} at index {index}")]
    UnknownConstantTag { tag: u8, index: u16 },
    #[error("unexpected end of class file")]
    Truncated,
    #[error("unknown opcode {opcode} at byte offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },
    #[error("malformed class file: {0}")]
    Malformed(String),
    #[error(transparent)]
    ConstantPool(#[from] ConstantPoolError),
}

/// Turns a class file on disk into a parsed class description.
pub trait ClassfileReader {
    fn read_classfile(&self, path: &Path) -> Result<Classfile, ClassfileReadError>;
}
