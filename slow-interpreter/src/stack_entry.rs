use std::sync::Arc;

use itertools::Itertools;

use rust_jvm_common::classfile::InstructionInfo;
use rust_jvm_common::InstructionIndex;
use rust_jvm_common::java_values::{JavaValue, ObjectAddress};
use runtime_class_stuff::{RuntimeClass, RuntimeMethod};

use crate::exceptions::{CallChain, ExecutionError, Fault, FrameSnapshot, InstructionError};

/// One activation record. The operand stack holds at most `max_stack` slots, long and double taking two.
pub struct StackEntry {
    pub class: Arc<RuntimeClass>,
    pub method: Arc<RuntimeMethod>,
    operand_stack: Vec<JavaValue>,
    stack_slots: usize,
    local_vars: Vec<Option<JavaValue>>,
    pub pc: InstructionIndex,
}

impl StackEntry {
    pub fn new(class: Arc<RuntimeClass>, method: Arc<RuntimeMethod>) -> Self {
        let max_locals = method.max_locals as usize;
        Self {
            class,
            method,
            operand_stack: vec![],
            stack_slots: 0,
            local_vars: vec![None; max_locals],
            pc: 0,
        }
    }

    pub fn operand_stack(&self) -> &[JavaValue] {
        self.operand_stack.as_slice()
    }

    pub fn locals(&self) -> &[Option<JavaValue>] {
        self.local_vars.as_slice()
    }

    pub fn stack_depth(&self) -> usize {
        self.operand_stack.len()
    }

    pub fn push(&mut self, value: JavaValue) -> Result<(), Fault> {
        let value = value.to_stack_value();
        let slots = if value.is_category_2() { 2 } else { 1 };
        if self.stack_slots + slots > self.method.max_stack as usize {
            return Err(Fault::OperandStackOverflow { max_stack: self.method.max_stack });
        }
        self.stack_slots += slots;
        self.operand_stack.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<JavaValue, Fault> {
        let value = self.operand_stack.pop().ok_or(Fault::EmptyStack)?;
        self.stack_slots -= if value.is_category_2() { 2 } else { 1 };
        Ok(value)
    }

    /// Value `depth` entries below the top, 0 being the top.
    pub fn peek(&self, depth: usize) -> Result<JavaValue, Fault> {
        self.operand_stack.iter().rev().nth(depth).copied().ok_or(Fault::EmptyStack)
    }

    pub fn pop_int(&mut self) -> Result<i32, Fault> {
        let value = self.pop()?;
        value.unwrap_int().ok_or(Fault::TypeMismatch { expected: "int", found: value })
    }

    pub fn pop_long(&mut self) -> Result<i64, Fault> {
        let value = self.pop()?;
        value.unwrap_long().ok_or(Fault::TypeMismatch { expected: "long", found: value })
    }

    pub fn pop_float(&mut self) -> Result<f32, Fault> {
        let value = self.pop()?;
        value.unwrap_float().ok_or(Fault::TypeMismatch { expected: "float", found: value })
    }

    pub fn pop_double(&mut self) -> Result<f64, Fault> {
        let value = self.pop()?;
        value.unwrap_double().ok_or(Fault::TypeMismatch { expected: "double", found: value })
    }

    pub fn pop_reference(&mut self) -> Result<Option<ObjectAddress>, Fault> {
        let value = self.pop()?;
        value.unwrap_object().ok_or(Fault::TypeMismatch { expected: "reference", found: value })
    }

    pub fn local_get(&self, index: u16) -> Result<JavaValue, Fault> {
        self.local_vars.get(index as usize)
            .ok_or(Fault::LocalOutOfRange { index, max_locals: self.method.max_locals })?
            .ok_or(Fault::UninitializedLocal(index))
    }

    /// Long and double occupy `index` and `index + 1`. The upper slot becomes unreadable.
    pub fn local_set(&mut self, index: u16, value: JavaValue) -> Result<(), Fault> {
        let value = value.to_stack_value();
        let last = if value.is_category_2() { index as usize + 1 } else { index as usize };
        if last >= self.local_vars.len() {
            return Err(Fault::LocalOutOfRange { index, max_locals: self.method.max_locals });
        }
        self.local_vars[index as usize] = Some(value);
        if last != index as usize {
            self.local_vars[last] = None;
        }
        Ok(())
    }

    pub fn instruction_count(&self) -> usize {
        self.method.instructions.len()
    }

    pub fn current_instruction(&self) -> Result<&InstructionInfo, Fault> {
        self.method.instructions.get(self.pc as usize).ok_or(Fault::FellOffEnd { pc: self.pc, instruction_count: self.instruction_count() })
    }

    pub fn method_display(&self) -> String {
        format!("{}.{}{}", self.class.name, self.method.name, self.method.desc_str)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            class_name: self.class.name.clone(),
            method_name: self.method.name.clone(),
            method_desc: self.method.desc_str.clone(),
            listing: self.method.instructions.iter().map(|instruction| format!("{:?}", instruction)).collect_vec(),
            pc: self.pc as usize,
            operand_stack: self.operand_stack.clone(),
            locals: self.local_vars.clone(),
        }
    }
}

/// The interpreter's explicit call stack. The last frame is the one executing.
#[derive(Default)]
pub struct JavaStack {
    frames: Vec<StackEntry>,
}

impl JavaStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: StackEntry) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<StackEntry> {
        self.frames.pop()
    }

    pub fn current_frame(&self) -> Option<&StackEntry> {
        self.frames.last()
    }

    pub fn current_frame_mut(&mut self) -> Option<&mut StackEntry> {
        self.frames.last_mut()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn call_chain(&self) -> CallChain {
        CallChain(self.frames.iter().rev().map(|frame| frame.method_display()).collect_vec())
    }

    /// Attaches the current frame's snapshot and the call chain to an instruction failure.
    pub fn frame_error(&self, error: InstructionError) -> ExecutionError {
        let snapshot = self.current_frame().map(|frame| Box::new(frame.snapshot()));
        ExecutionError::Frame { error: Box::new(error), snapshot, call_chain: self.call_chain() }
    }
}
