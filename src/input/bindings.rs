// Player key bindings
//
// Two players share one keyboard. Each has nine actions bound to engine keys;
// the defaults below are applied before any configuration file is read.

use super::keys::Key;
use serde::{Deserialize, Serialize};

/// Player action that can be bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Fire,
    NextWeapon,
    PrevWeapon,
    Use,
}

/// Key bindings for a single player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBindings {
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
    pub jump: Key,
    pub fire: Key,
    /// Switch to the next weapon
    pub next: Key,
    /// Switch to the previous weapon
    pub prev: Key,
    #[serde(rename = "use")]
    pub use_key: Key,
}

impl PlayerBindings {
    /// Default bindings for Player 1
    ///
    /// # Default Mappings
    /// - Keypad 8/5/4/6: up/down/left/right
    /// - Page Down: fire
    /// - Delete: jump
    /// - Home/End: previous/next weapon
    /// - Keypad 8: use
    pub fn player1_default() -> Self {
        Self {
            left: Key::Kp4,
            right: Key::Kp6,
            up: Key::Kp8,
            down: Key::Kp5,
            jump: Key::Delete,
            fire: Key::PageDown,
            next: Key::End,
            prev: Key::Home,
            use_key: Key::Kp8,
        }
    }

    /// Default bindings for Player 2
    ///
    /// # Default Mappings
    /// - E/D/S/F: up/down/left/right
    /// - A: fire
    /// - Q: jump
    /// - 1/2: previous/next weapon
    /// - E: use
    pub fn player2_default() -> Self {
        Self {
            left: Key::S,
            right: Key::F,
            up: Key::E,
            down: Key::D,
            jump: Key::Q,
            fire: Key::A,
            next: Key::Num2,
            prev: Key::Num1,
            use_key: Key::E,
        }
    }

    /// Key bound to an action
    pub fn key_for(&self, action: Action) -> Key {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Jump => self.jump,
            Action::Fire => self.fire,
            Action::NextWeapon => self.next,
            Action::PrevWeapon => self.prev,
            Action::Use => self.use_key,
        }
    }

    /// Every action triggered by a key
    ///
    /// A key may drive several actions (the defaults bind "up" and "use" to
    /// the same key), so this returns all of them in declaration order.
    pub fn actions_for(&self, key: Key) -> Vec<Action> {
        const ALL: [Action; 9] = [
            Action::Left,
            Action::Right,
            Action::Up,
            Action::Down,
            Action::Jump,
            Action::Fire,
            Action::NextWeapon,
            Action::PrevWeapon,
            Action::Use,
        ];
        if !key.is_known() {
            return Vec::new();
        }
        ALL.into_iter()
            .filter(|&action| self.key_for(action) == key)
            .collect()
    }
}

/// Bindings for both players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    pub player1: PlayerBindings,
    pub player2: PlayerBindings,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            player1: PlayerBindings::player1_default(),
            player2: PlayerBindings::player2_default(),
        }
    }
}
