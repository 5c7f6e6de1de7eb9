use log::trace;

use rust_jvm_common::InstructionIndex;
use rust_jvm_common::java_values::JavaValue;

use crate::exceptions::{ExecutionError, Fault};
use crate::interpreter::single_instruction::run_single_instruction;
use crate::jvm_state::JVMState;
use crate::stack_entry::{JavaStack, StackEntry};

pub mod single_instruction;
pub mod load;
pub mod consts;
pub mod fields;
pub mod new;
pub mod dup;
pub mod ldc;
pub mod store;
pub mod branch;
pub mod special;
pub mod conversion;
pub mod arithmetic;
pub mod cmp;
pub mod switch;
pub mod pop;
pub mod invoke;

/// What the run loop does after an instruction.
pub enum PostInstructionAction {
    Next,
    Jump { target: InstructionIndex },
    Return { res: Option<JavaValue> },
    /// Pushes a callee. The caller resumes after the call instruction.
    Call { frame: StackEntry },
    /// Pushes static initializers. The instruction that triggered them executes again afterwards.
    InitClass { frames: Vec<StackEntry> },
}

/// Executes frames until the stack is empty. Returns the value produced by the bottom frame.
pub fn run_function_interpreted(jvm: &mut JVMState, stack: &mut JavaStack) -> Result<Option<JavaValue>, ExecutionError> {
    let mut last_return = None;
    loop {
        let current_frame = match stack.current_frame_mut() {
            None => return Ok(last_return),
            Some(current_frame) => current_frame,
        };
        let action = match run_single_instruction(jvm, current_frame) {
            Ok(action) => action,
            Err(err) => return Err(stack.frame_error(err)),
        };
        match action {
            PostInstructionAction::Next => {
                current_frame.pc += 1;
            }
            PostInstructionAction::Jump { target } => {
                current_frame.pc = target;
            }
            PostInstructionAction::Return { res } => {
                if let Some(finished) = stack.pop() {
                    trace!("return from {}", finished.method_display());
                }
                match stack.current_frame_mut() {
                    None => last_return = res,
                    Some(caller) => {
                        if let Some(res) = res {
                            if let Err(fault) = caller.push(res) {
                                return Err(stack.frame_error(fault.into()));
                            }
                        }
                    }
                }
            }
            PostInstructionAction::Call { frame } => {
                current_frame.pc += 1;
                trace!("call {}", frame.method_display());
                stack.push(frame);
            }
            PostInstructionAction::InitClass { frames } => {
                for frame in frames {
                    stack.push(frame);
                }
            }
        }
    }
}

/// Validates a branch target against the current method.
pub fn jump_to(current_frame: &StackEntry, target: InstructionIndex) -> Result<PostInstructionAction, Fault> {
    if target as usize >= current_frame.instruction_count() {
        return Err(Fault::BranchOutOfRange { target: target as i64, instruction_count: current_frame.instruction_count() });
    }
    Ok(PostInstructionAction::Jump { target })
}
