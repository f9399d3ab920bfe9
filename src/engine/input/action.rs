// Logical game inputs and the generic default key bindings

use super::device::{DeviceButton, Key};
use super::scheme::InputScheme;

/// Number of logical controllers (one per player side)
pub const NUM_GAME_CONTROLLERS: usize = 2;

/// Upper bound on buttons per controller across all schemes
pub const MAX_GAME_BUTTONS: usize = 32;

/// Suffix appended to a button name to address the second controller
const SECOND_CONTROLLER_SUFFIX: &str = "_P2";

/// A logical controller slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GameController {
    Controller1,
    Controller2,
    Invalid,
}

impl GameController {
    /// All valid controllers, in table order
    pub const ALL: [GameController; NUM_GAME_CONTROLLERS] =
        [GameController::Controller1, GameController::Controller2];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Self::Invalid)
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Self::Controller1 => Some(0),
            Self::Controller2 => Some(1),
            Self::Invalid => None,
        }
    }

    /// The controller after this one, `Invalid` past the last
    pub fn next(self) -> Self {
        self.index()
            .map(|i| Self::from_index(i + 1))
            .unwrap_or(Self::Invalid)
    }

    pub fn is_valid(self) -> bool {
        self != Self::Invalid
    }
}

/// Index of a logical button within a scheme
///
/// Indices below `GameButton::NEXT` are shared by every scheme; each scheme
/// numbers its own buttons from `GameButton::NEXT` upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameButton(pub u8);

impl GameButton {
    pub const MENU_LEFT: GameButton = GameButton(0);
    pub const MENU_RIGHT: GameButton = GameButton(1);
    pub const MENU_UP: GameButton = GameButton(2);
    pub const MENU_DOWN: GameButton = GameButton(3);
    pub const START: GameButton = GameButton(4);
    pub const SELECT: GameButton = GameButton(5);
    pub const BACK: GameButton = GameButton(6);
    pub const COIN: GameButton = GameButton(7);
    pub const OPERATOR: GameButton = GameButton(8);
    pub const EFFECT_UP: GameButton = GameButton(9);
    pub const EFFECT_DOWN: GameButton = GameButton(10);

    /// First scheme-specific button
    pub const NEXT: GameButton = GameButton(11);

    pub const INVALID: GameButton = GameButton(u8::MAX);

    /// The n-th scheme-specific button
    pub const fn custom(n: u8) -> GameButton {
        GameButton(Self::NEXT.0 + n)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn is_valid(self) -> bool {
        self.index() < MAX_GAME_BUTTONS
    }
}

/// A logical input: one button on one controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameInput {
    pub controller: GameController,
    pub button: GameButton,
}

impl GameInput {
    pub const INVALID: GameInput = GameInput {
        controller: GameController::Invalid,
        button: GameButton::INVALID,
    };

    pub fn new(controller: GameController, button: GameButton) -> Self {
        Self { controller, button }
    }

    pub fn is_valid(&self) -> bool {
        self.controller.is_valid() && self.button.is_valid()
    }

    /// Keymap name of this input in a scheme, e.g. `Left` or `Left_P2`
    pub fn to_name(&self, scheme: &InputScheme) -> String {
        let name = scheme.button_name(self.button);
        match self.controller {
            GameController::Controller1 => name.to_string(),
            GameController::Controller2 => format!("{}{}", name, SECOND_CONTROLLER_SUFFIX),
            GameController::Invalid => String::new(),
        }
    }

    /// Parse a keymap name, `INVALID` if the scheme has no such button
    pub fn from_name(scheme: &InputScheme, name: &str) -> Self {
        let suffixed = strip_suffix_ignore_case(name, SECOND_CONTROLLER_SUFFIX);
        let (controller, button_name) = match suffixed {
            Some(base) => (GameController::Controller2, base),
            None => (GameController::Controller1, name),
        };

        match scheme.button_name_to_index(button_name) {
            Some(button) => Self::new(controller, button),
            None => Self::INVALID,
        }
    }
}

impl Default for GameInput {
    fn default() -> Self {
        Self::INVALID
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    let (base, tail) = (s.get(..split)?, s.get(split..)?);
    tail.eq_ignore_ascii_case(suffix).then_some(base)
}

/// One physical-to-logical binding in a default or factory mapping list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputMapping {
    pub device_button: DeviceButton,
    pub game_button: GameButton,
    /// Bind on the controller after the one being mapped
    pub second_controller: bool,
}

impl InputMapping {
    pub const fn new(device_button: DeviceButton, game_button: GameButton) -> Self {
        Self {
            device_button,
            game_button,
            second_controller: false,
        }
    }

    pub const fn second(device_button: DeviceButton, game_button: GameButton) -> Self {
        Self {
            device_button,
            game_button,
            second_controller: true,
        }
    }
}

const fn key(key: Key) -> DeviceButton {
    DeviceButton::Key(key)
}

/// Generic keyboard bindings applied to every scheme
pub const DEFAULT_KEY_MAPPINGS: &[InputMapping] = &[
    InputMapping::new(key(Key::Left), GameButton::MENU_LEFT),
    InputMapping::new(key(Key::Right), GameButton::MENU_RIGHT),
    InputMapping::new(key(Key::Up), GameButton::MENU_UP),
    InputMapping::new(key(Key::Down), GameButton::MENU_DOWN),
    InputMapping::new(key(Key::Enter), GameButton::START),
    InputMapping::new(key(Key::Char('/')), GameButton::SELECT),
    InputMapping::new(key(Key::Escape), GameButton::BACK),
    InputMapping::second(key(Key::Kp(4)), GameButton::MENU_LEFT),
    InputMapping::second(key(Key::Kp(6)), GameButton::MENU_RIGHT),
    InputMapping::second(key(Key::Kp(8)), GameButton::MENU_UP),
    InputMapping::second(key(Key::Kp(2)), GameButton::MENU_DOWN),
    InputMapping::second(key(Key::KpEnter), GameButton::START),
    InputMapping::second(key(Key::Kp(0)), GameButton::SELECT),
    InputMapping::second(key(Key::NumLock), GameButton::BACK),
    InputMapping::new(key(Key::F(1)), GameButton::COIN),
    InputMapping::new(key(Key::ScrollLock), GameButton::OPERATOR),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::scheme::DANCE;
    use std::collections::HashSet;

    #[test]
    fn test_controller_indices() {
        assert_eq!(GameController::from_index(0), GameController::Controller1);
        assert_eq!(GameController::from_index(1), GameController::Controller2);
        assert_eq!(GameController::from_index(2), GameController::Invalid);
        assert_eq!(
            GameController::Controller1.next(),
            GameController::Controller2
        );
        assert_eq!(GameController::Controller2.next(), GameController::Invalid);
        assert_eq!(GameController::Invalid.next(), GameController::Invalid);
    }

    #[test]
    fn test_game_input_validity() {
        assert!(!GameInput::INVALID.is_valid());
        assert!(GameInput::new(GameController::Controller2, GameButton::START).is_valid());
        assert!(!GameInput::new(GameController::Controller1, GameButton(40)).is_valid());
    }

    #[test]
    fn test_name_round_trip() {
        let left = GameInput::new(GameController::Controller1, GameButton::custom(0));
        assert_eq!(left.to_name(&DANCE), "Left");
        assert_eq!(GameInput::from_name(&DANCE, "Left"), left);

        let start_p2 = GameInput::new(GameController::Controller2, GameButton::START);
        assert_eq!(start_p2.to_name(&DANCE), "Start_P2");
        assert_eq!(GameInput::from_name(&DANCE, "start_p2"), start_p2);
    }

    #[test]
    fn test_unknown_name_is_invalid() {
        assert_eq!(GameInput::from_name(&DANCE, "Jump"), GameInput::INVALID);
        assert_eq!(GameInput::from_name(&DANCE, "_P2"), GameInput::INVALID);
        assert_eq!(GameInput::from_name(&DANCE, ""), GameInput::INVALID);
    }

    #[test]
    fn test_default_key_mappings_have_no_duplicate_keys() {
        let mut seen = HashSet::new();
        for mapping in DEFAULT_KEY_MAPPINGS {
            assert!(
                seen.insert(mapping.device_button),
                "Duplicate key in default mappings"
            );
            assert!(mapping.device_button.is_valid());
            assert!(mapping.game_button < GameButton::NEXT);
        }
    }
}
