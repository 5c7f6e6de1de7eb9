use std::fmt::{Display, Formatter};

use itertools::Itertools;
use thiserror::Error;

use loading::ClassLoadingError;
use memory_manager::MemoryError;
use rust_jvm_common::classfile::ConstantPoolError;
use rust_jvm_common::classnames::ClassName;
use rust_jvm_common::java_values::JavaValue;
use runtime_class_stuff::LinkError;

/// Program level failures. The engine has no exception dispatch, so every one of these aborts the run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Fault {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: JavaValue },
    #[error("pop from an empty operand stack")]
    EmptyStack,
    #[error("operand stack overflow, max stack is {max_stack}")]
    OperandStackOverflow { max_stack: u16 },
    #[error("local variable {index} out of range, max locals is {max_locals}")]
    LocalOutOfRange { index: u16, max_locals: u16 },
    #[error("local variable {0} read before it was written")]
    UninitializedLocal(u16),
    #[error("branch target {target} out of range, method has {instruction_count} instructions")]
    BranchOutOfRange { target: i64, instruction_count: usize },
    #[error("instruction pointer {pc} ran off the end of the method ({instruction_count} instructions)")]
    FellOffEnd { pc: u16, instruction_count: usize },
    #[error("null pointer in {0}")]
    NullPointer(&'static str),
    #[error("negative array size {0}")]
    NegativeArraySize(i32),
    #[error("array index {index} out of bounds for length {length}")]
    ArrayIndexOutOfBounds { index: i32, length: i32 },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{from} cannot be cast to {to}")]
    ClassCast { from: ClassName, to: ClassName },
    #[error("{method} expects {expected} argument(s) ({expected_types}) but the stack holds {available}: [{passed}]")]
    ArgumentCount { method: String, expected: usize, expected_types: String, available: usize, passed: String },
    #[error("cannot instantiate {0}")]
    Instantiation(ClassName),
    #[error("abstract method {0} invoked")]
    AbstractMethod(String),
    #[error("incompatible class change: {0}")]
    IncompatibleClassChange(String),
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}

/// Everything an individual instruction can fail with.
#[derive(Debug, Error)]
pub enum InstructionError {
    #[error(transparent)]
    Fault(#[from] Fault),
    #[error(transparent)]
    Loading(#[from] ClassLoadingError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

impl From<ConstantPoolError> for InstructionError {
    fn from(err: ConstantPoolError) -> Self {
        InstructionError::Link(err.into())
    }
}

/// A frame as it was when an instruction failed.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub class_name: ClassName,
    pub method_name: String,
    pub method_desc: String,
    pub listing: Vec<String>,
    pub pc: usize,
    pub operand_stack: Vec<JavaValue>,
    pub locals: Vec<Option<JavaValue>>,
}

impl Display for FrameSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "class: {}", self.class_name)?;
        writeln!(f, "method: {}{}", self.method_name, self.method_desc)?;
        writeln!(f, "instructions:")?;
        for (i, instruction) in self.listing.iter().enumerate() {
            let marker = if i == self.pc { "  ->" } else { "    " };
            writeln!(f, "{} {:>4}: {}", marker, i, instruction)?;
        }
        writeln!(f, "operand stack: [{}]", self.operand_stack.iter().join(", "))?;
        let locals = self.locals.iter().enumerate().map(|(i, local)| match local {
            None => format!("{}:null!", i),
            Some(value) => format!("{}:{}", i, value),
        }).join(" ");
        writeln!(f, "locals: {}", locals)
    }
}

/// Methods on the stack when a run failed, innermost first.
#[derive(Debug, Clone, Default)]
pub struct CallChain(pub Vec<String>);

impl Display for CallChain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (depth, method) in self.0.iter().enumerate() {
            writeln!(f, "{:width$}{}", "", method, width = depth * 2)?;
        }
        Ok(())
    }
}

/// Failure of a whole run as seen by the host.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Loading(#[from] ClassLoadingError),
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("entry point {0} is not static")]
    EntryNotStatic(String),
    #[error("{error}\n{}method call chain:\n{call_chain}", .snapshot.as_ref().map(|snapshot| snapshot.to_string()).unwrap_or_default())]
    Frame { error: Box<InstructionError>, snapshot: Option<Box<FrameSnapshot>>, call_chain: CallChain },
}

impl ExecutionError {
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ExecutionError::Frame { error, .. } => match error.as_ref() {
                InstructionError::Fault(fault) => Some(fault),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Option<&FrameSnapshot> {
        match self {
            ExecutionError::Frame { snapshot, .. } => snapshot.as_deref(),
            _ => None,
        }
    }
}
