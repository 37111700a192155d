//! Static key-usage scanning
//!
//! Walks the instruction nodes of every original target and collects the
//! key options referenced by key-pressed predicates and when-key-pressed
//! hats. Key options are compared lower-case. Best effort: nodes without a
//! readable key field are skipped.

use stagehand_core::{KeySet, KeyToken, ProgramView};

/// Menu shadow feeding the "key pressed?" predicate
pub const OPCODE_KEY_OPTIONS: &str = "sensing_keyoptions";
/// "When key pressed" hat
pub const OPCODE_WHEN_KEY_PRESSED: &str = "event_whenkeypressed";
/// Field carrying the key option in both opcodes
pub const FIELD_KEY_OPTION: &str = "KEY_OPTION";

/// Collect the keys a program reads, in discovery order
pub fn scan(program: &(impl ProgramView + ?Sized)) -> KeySet {
    let mut keys = KeySet::new();

    for target in program.targets().iter().filter(|t| t.is_original) {
        for block in target.blocks() {
            let Some(opcode) = block.opcode() else {
                tracing::trace!(entity = %target.name, block = block.id, "block without opcode skipped");
                continue;
            };
            if opcode != OPCODE_KEY_OPTIONS && opcode != OPCODE_WHEN_KEY_PRESSED {
                continue;
            }
            match block.field_value(FIELD_KEY_OPTION) {
                Some(value) => {
                    keys.insert(KeyToken::new(value.to_lowercase()));
                }
                None => {
                    tracing::trace!(entity = %target.name, block = block.id, "key block without key field skipped");
                }
            }
        }
    }

    tracing::debug!(keys = keys.len(), "scanned program keys");
    keys
}
