use rust_jvm_common::classfile::{LookupSwitch, TableSwitch};

use crate::exceptions::Fault;
use crate::interpreter::{jump_to, PostInstructionAction};
use crate::stack_entry::StackEntry;

pub fn tableswitch(current_frame: &mut StackEntry, switch: &TableSwitch) -> Result<PostInstructionAction, Fault> {
    let index = current_frame.pop_int()?;
    let target = if index < switch.low || index > switch.high {
        switch.default
    } else {
        match switch.targets.get((index as i64 - switch.low as i64) as usize) {
            Some(target) => *target,
            None => switch.default,
        }
    };
    jump_to(current_frame, target)
}

pub fn lookupswitch(current_frame: &mut StackEntry, switch: &LookupSwitch) -> Result<PostInstructionAction, Fault> {
    let key = current_frame.pop_int()?;
    let target = switch.pairs.iter()
        .find(|(match_, _)| *match_ == key)
        .map(|(_, target)| *target)
        .unwrap_or(switch.default);
    jump_to(current_frame, target)
}
