// Input module - keyboard and text input as the game sees it
//
// This module provides:
// - Key translation from physical key codes to engine keys
// - UTF-8 text-input decoding to CP866
// - Per-player key bindings

pub mod bindings;
pub mod keys;
pub mod text;

pub use bindings::{Action, Bindings, PlayerBindings};
pub use keys::{translate_code, translate_key, Key};
pub use text::{decode_text_char, decode_text_unit, unicode_to_cp866};
