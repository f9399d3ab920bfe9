// Per-game-mode input schemes

use super::action::{GameButton, GameController, GameInput, InputMapping, MAX_GAME_BUTTONS};
use super::device::{DeviceButton, Key};
use super::player::PlayerNumber;

/// Name of a logical button and the menu action it doubles as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameButtonInfo {
    pub name: &'static str,
    /// `GameButton::INVALID` when the button has no menu role
    pub secondary_menu_button: GameButton,
}

impl GameButtonInfo {
    pub const fn new(name: &'static str, secondary_menu_button: GameButton) -> Self {
        Self {
            name,
            secondary_menu_button,
        }
    }
}

/// Buttons every scheme has, indexed from zero
const COMMON_BUTTON_INFO: [GameButtonInfo; GameButton::NEXT.0 as usize] = [
    GameButtonInfo::new("MenuLeft", GameButton::MENU_LEFT),
    GameButtonInfo::new("MenuRight", GameButton::MENU_RIGHT),
    GameButtonInfo::new("MenuUp", GameButton::MENU_UP),
    GameButtonInfo::new("MenuDown", GameButton::MENU_DOWN),
    GameButtonInfo::new("Start", GameButton::START),
    GameButtonInfo::new("Select", GameButton::SELECT),
    GameButtonInfo::new("Back", GameButton::BACK),
    GameButtonInfo::new("Coin", GameButton::COIN),
    GameButtonInfo::new("Operator", GameButton::OPERATOR),
    GameButtonInfo::new("EffectUp", GameButton::EFFECT_UP),
    GameButtonInfo::new("EffectDown", GameButton::EFFECT_DOWN),
];

/// Static description of the logical buttons of one game mode
#[derive(Debug)]
pub struct InputScheme {
    /// Game name; also the keymap section and the auto-mapping key
    pub name: &'static str,
    /// Scheme-specific buttons, numbered from `GameButton::NEXT`
    pub buttons: &'static [GameButtonInfo],
    /// Default keyboard bindings, applied after the generic ones
    pub default_mappings: &'static [InputMapping],
}

impl InputScheme {
    /// Total buttons per controller, common buttons included
    pub fn buttons_per_controller(&self) -> usize {
        (COMMON_BUTTON_INFO.len() + self.buttons.len()).min(MAX_GAME_BUTTONS)
    }

    /// All buttons of this scheme in index order
    pub fn game_buttons(&self) -> impl Iterator<Item = GameButton> {
        (0..self.buttons_per_controller()).map(|i| GameButton(i as u8))
    }

    pub fn button_info(&self, button: GameButton) -> Option<&GameButtonInfo> {
        let index = button.index();
        if index >= self.buttons_per_controller() {
            return None;
        }
        COMMON_BUTTON_INFO
            .get(index)
            .or_else(|| self.buttons.get(index - COMMON_BUTTON_INFO.len()))
    }

    /// Button name, empty for buttons outside the scheme
    pub fn button_name(&self, button: GameButton) -> &'static str {
        self.button_info(button).map(|info| info.name).unwrap_or("")
    }

    /// Case-insensitive lookup of a button by name
    pub fn button_name_to_index(&self, name: &str) -> Option<GameButton> {
        self.game_buttons()
            .find(|&button| self.button_name(button).eq_ignore_ascii_case(name))
    }

    /// The menu action a game button also performs
    ///
    /// With `only_dedicated_menu_buttons` set, scheme-specific buttons never
    /// act as menu buttons.
    pub fn game_button_to_menu_button(
        &self,
        button: GameButton,
        only_dedicated_menu_buttons: bool,
    ) -> GameButton {
        if only_dedicated_menu_buttons && button >= GameButton::NEXT {
            return GameButton::INVALID;
        }
        self.button_info(button)
            .map(|info| info.secondary_menu_button)
            .unwrap_or(GameButton::INVALID)
    }

    /// Every game button that performs the given menu action
    pub fn menu_button_to_game_buttons(
        &self,
        menu_button: GameButton,
        only_dedicated_menu_buttons: bool,
    ) -> Vec<GameButton> {
        if menu_button == GameButton::INVALID {
            return Vec::new();
        }

        self.game_buttons()
            .take_while(|&button| !(only_dedicated_menu_buttons && button >= GameButton::NEXT))
            .filter(|&button| {
                self.button_info(button)
                    .is_some_and(|info| info.secondary_menu_button == menu_button)
            })
            .collect()
    }

    /// Game inputs for a menu action, on both controllers when no player is given
    pub fn menu_button_to_game_inputs(
        &self,
        menu_button: GameButton,
        player: Option<PlayerNumber>,
        only_dedicated_menu_buttons: bool,
    ) -> Vec<GameInput> {
        let mut inputs = Vec::new();
        for button in self.menu_button_to_game_buttons(menu_button, only_dedicated_menu_buttons) {
            match player {
                Some(player) => inputs.push(GameInput::new(player.controller(), button)),
                None => {
                    inputs.extend(
                        GameController::ALL
                            .iter()
                            .map(|&controller| GameInput::new(controller, button)),
                    );
                }
            }
        }
        inputs
    }

    /// Look up a built-in scheme by name, ignoring case
    pub fn find(name: &str) -> Option<&'static InputScheme> {
        BUILTIN_SCHEMES
            .iter()
            .copied()
            .find(|scheme| scheme.name.eq_ignore_ascii_case(name))
    }
}

const fn key(key: Key) -> DeviceButton {
    DeviceButton::Key(key)
}

/// Dance pad buttons
pub mod dance {
    use super::GameButton;

    pub const LEFT: GameButton = GameButton::custom(0);
    pub const RIGHT: GameButton = GameButton::custom(1);
    pub const UP: GameButton = GameButton::custom(2);
    pub const DOWN: GameButton = GameButton::custom(3);
    pub const UP_LEFT: GameButton = GameButton::custom(4);
    pub const UP_RIGHT: GameButton = GameButton::custom(5);
}

/// Pump pad buttons
pub mod pump {
    use super::GameButton;

    pub const UP_LEFT: GameButton = GameButton::custom(0);
    pub const UP_RIGHT: GameButton = GameButton::custom(1);
    pub const CENTER: GameButton = GameButton::custom(2);
    pub const DOWN_LEFT: GameButton = GameButton::custom(3);
    pub const DOWN_RIGHT: GameButton = GameButton::custom(4);
}

/// Para controller sensors
pub mod para {
    use super::GameButton;

    pub const LEFT: GameButton = GameButton::custom(0);
    pub const UP_LEFT: GameButton = GameButton::custom(1);
    pub const UP: GameButton = GameButton::custom(2);
    pub const UP_RIGHT: GameButton = GameButton::custom(3);
    pub const RIGHT: GameButton = GameButton::custom(4);
}

/// Techno pad buttons
pub mod techno {
    use super::GameButton;

    pub const LEFT: GameButton = GameButton::custom(0);
    pub const RIGHT: GameButton = GameButton::custom(1);
    pub const UP: GameButton = GameButton::custom(2);
    pub const DOWN: GameButton = GameButton::custom(3);
    pub const UP_LEFT: GameButton = GameButton::custom(4);
    pub const UP_RIGHT: GameButton = GameButton::custom(5);
    pub const CENTER: GameButton = GameButton::custom(6);
    pub const DOWN_LEFT: GameButton = GameButton::custom(7);
    pub const DOWN_RIGHT: GameButton = GameButton::custom(8);
}

pub static DANCE: InputScheme = InputScheme {
    name: "dance",
    buttons: &[
        GameButtonInfo::new("Left", GameButton::MENU_LEFT),
        GameButtonInfo::new("Right", GameButton::MENU_RIGHT),
        GameButtonInfo::new("Up", GameButton::MENU_UP),
        GameButtonInfo::new("Down", GameButton::MENU_DOWN),
        GameButtonInfo::new("UpLeft", GameButton::INVALID),
        GameButtonInfo::new("UpRight", GameButton::INVALID),
    ],
    default_mappings: &[
        InputMapping::new(key(Key::Left), dance::LEFT),
        InputMapping::new(key(Key::Right), dance::RIGHT),
        InputMapping::new(key(Key::Up), dance::UP),
        InputMapping::new(key(Key::Down), dance::DOWN),
        InputMapping::second(key(Key::Kp(4)), dance::LEFT),
        InputMapping::second(key(Key::Kp(6)), dance::RIGHT),
        InputMapping::second(key(Key::Kp(8)), dance::UP),
        InputMapping::second(key(Key::Kp(2)), dance::DOWN),
        InputMapping::second(key(Key::Kp(7)), dance::UP_LEFT),
        InputMapping::second(key(Key::Kp(9)), dance::UP_RIGHT),
    ],
};

pub static PUMP: InputScheme = InputScheme {
    name: "pump",
    buttons: &[
        GameButtonInfo::new("UpLeft", GameButton::MENU_UP),
        GameButtonInfo::new("UpRight", GameButton::MENU_DOWN),
        GameButtonInfo::new("Center", GameButton::START),
        GameButtonInfo::new("DownLeft", GameButton::MENU_LEFT),
        GameButtonInfo::new("DownRight", GameButton::MENU_RIGHT),
    ],
    default_mappings: &[
        InputMapping::new(key(Key::Char('q')), pump::UP_LEFT),
        InputMapping::new(key(Key::Char('e')), pump::UP_RIGHT),
        InputMapping::new(key(Key::Char('s')), pump::CENTER),
        InputMapping::new(key(Key::Char('z')), pump::DOWN_LEFT),
        InputMapping::new(key(Key::Char('c')), pump::DOWN_RIGHT),
        InputMapping::second(key(Key::Kp(7)), pump::UP_LEFT),
        InputMapping::second(key(Key::Kp(9)), pump::UP_RIGHT),
        InputMapping::second(key(Key::Kp(5)), pump::CENTER),
        InputMapping::second(key(Key::Kp(1)), pump::DOWN_LEFT),
        InputMapping::second(key(Key::Kp(3)), pump::DOWN_RIGHT),
    ],
};

pub static PARA: InputScheme = InputScheme {
    name: "para",
    buttons: &[
        GameButtonInfo::new("Left", GameButton::MENU_LEFT),
        GameButtonInfo::new("UpLeft", GameButton::MENU_UP),
        GameButtonInfo::new("Up", GameButton::START),
        GameButtonInfo::new("UpRight", GameButton::MENU_DOWN),
        GameButtonInfo::new("Right", GameButton::MENU_RIGHT),
    ],
    default_mappings: &[
        InputMapping::new(key(Key::Char('z')), para::LEFT),
        InputMapping::new(key(Key::Char('x')), para::UP_LEFT),
        InputMapping::new(key(Key::Char('c')), para::UP),
        InputMapping::new(key(Key::Char('v')), para::UP_RIGHT),
        InputMapping::new(key(Key::Char('b')), para::RIGHT),
    ],
};

pub static TECHNO: InputScheme = InputScheme {
    name: "techno",
    buttons: &[
        GameButtonInfo::new("Left", GameButton::MENU_LEFT),
        GameButtonInfo::new("Right", GameButton::MENU_RIGHT),
        GameButtonInfo::new("Up", GameButton::MENU_UP),
        GameButtonInfo::new("Down", GameButton::MENU_DOWN),
        GameButtonInfo::new("UpLeft", GameButton::INVALID),
        GameButtonInfo::new("UpRight", GameButton::INVALID),
        GameButtonInfo::new("Center", GameButton::START),
        GameButtonInfo::new("DownLeft", GameButton::INVALID),
        GameButtonInfo::new("DownRight", GameButton::INVALID),
    ],
    default_mappings: &[
        InputMapping::new(key(Key::Char('a')), techno::LEFT),
        InputMapping::new(key(Key::Char('d')), techno::RIGHT),
        InputMapping::new(key(Key::Char('w')), techno::UP),
        InputMapping::new(key(Key::Char('x')), techno::DOWN),
        InputMapping::new(key(Key::Char('q')), techno::UP_LEFT),
        InputMapping::new(key(Key::Char('e')), techno::UP_RIGHT),
        InputMapping::new(key(Key::Char('s')), techno::CENTER),
        InputMapping::new(key(Key::Char('z')), techno::DOWN_LEFT),
        InputMapping::new(key(Key::Char('c')), techno::DOWN_RIGHT),
    ],
};

/// Every scheme shipped with the engine
pub static BUILTIN_SCHEMES: &[&InputScheme] = &[&DANCE, &PUMP, &PARA, &TECHNO];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_count() {
        assert_eq!(DANCE.buttons_per_controller(), 17);
        assert_eq!(PUMP.buttons_per_controller(), 16);
        assert_eq!(DANCE.game_buttons().count(), 17);
    }

    #[test]
    fn test_button_names() {
        assert_eq!(DANCE.button_name(GameButton::START), "Start");
        assert_eq!(DANCE.button_name(dance::UP_RIGHT), "UpRight");
        assert_eq!(DANCE.button_name(GameButton::custom(6)), "");
        assert_eq!(DANCE.button_name(GameButton::INVALID), "");
    }

    #[test]
    fn test_button_name_lookup_ignores_case() {
        assert_eq!(DANCE.button_name_to_index("upleft"), Some(dance::UP_LEFT));
        assert_eq!(
            DANCE.button_name_to_index("MENULEFT"),
            Some(GameButton::MENU_LEFT)
        );
        assert_eq!(DANCE.button_name_to_index("Center"), None);
        assert_eq!(PUMP.button_name_to_index("Center"), Some(pump::CENTER));
    }

    #[test]
    fn test_game_button_to_menu_button() {
        assert_eq!(
            DANCE.game_button_to_menu_button(dance::LEFT, false),
            GameButton::MENU_LEFT
        );
        assert_eq!(
            DANCE.game_button_to_menu_button(dance::UP_LEFT, false),
            GameButton::INVALID
        );
        assert_eq!(
            DANCE.game_button_to_menu_button(dance::LEFT, true),
            GameButton::INVALID
        );
        assert_eq!(
            DANCE.game_button_to_menu_button(GameButton::START, true),
            GameButton::START
        );
    }

    #[test]
    fn test_menu_button_to_game_buttons() {
        let buttons = DANCE.menu_button_to_game_buttons(GameButton::MENU_LEFT, false);
        assert_eq!(buttons, vec![GameButton::MENU_LEFT, dance::LEFT]);

        let dedicated = DANCE.menu_button_to_game_buttons(GameButton::MENU_LEFT, true);
        assert_eq!(dedicated, vec![GameButton::MENU_LEFT]);

        assert!(DANCE
            .menu_button_to_game_buttons(GameButton::INVALID, false)
            .is_empty());
    }

    #[test]
    fn test_menu_button_to_game_inputs() {
        let both = PUMP.menu_button_to_game_inputs(GameButton::START, None, false);
        assert_eq!(
            both,
            vec![
                GameInput::new(GameController::Controller1, GameButton::START),
                GameInput::new(GameController::Controller2, GameButton::START),
                GameInput::new(GameController::Controller1, pump::CENTER),
                GameInput::new(GameController::Controller2, pump::CENTER),
            ]
        );

        let p2 = PUMP.menu_button_to_game_inputs(GameButton::START, Some(PlayerNumber::P2), false);
        assert_eq!(
            p2,
            vec![
                GameInput::new(GameController::Controller2, GameButton::START),
                GameInput::new(GameController::Controller2, pump::CENTER),
            ]
        );
    }

    #[test]
    fn test_find_builtin_scheme() {
        assert_eq!(InputScheme::find("Dance").map(|s| s.name), Some("dance"));
        assert_eq!(InputScheme::find("techno").map(|s| s.name), Some("techno"));
        assert!(InputScheme::find("guitar").is_none());
    }

    #[test]
    fn test_default_mappings_target_scheme_buttons() {
        for scheme in BUILTIN_SCHEMES {
            for mapping in scheme.default_mappings {
                assert!(
                    mapping.game_button.index() < scheme.buttons_per_controller(),
                    "{} maps outside its buttons",
                    scheme.name
                );
                assert!(mapping.device_button.is_key());
            }
        }
    }
}
