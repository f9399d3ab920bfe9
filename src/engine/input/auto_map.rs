// Factory mappings for known controllers, matched by driver description

use super::action::{GameButton, InputMapping};
use super::device::{DeviceButton, JoyAxis, JoyHat};
use super::scheme::{dance, para, pump, techno};
use log::warn;
use regex::Regex;
use std::sync::OnceLock;

/// A known controller and the mapping it gets when plugged in
#[derive(Debug)]
pub struct AutoJoyMapping {
    /// Scheme name this mapping applies to
    pub game: &'static str,
    /// Pattern searched for in the description the driver reports
    pub driver_regex: &'static str,
    /// Product name, for logs and UI
    pub controller_name: &'static str,
    pub maps: &'static [InputMapping],
}

/// The auto-mapping table with its driver patterns compiled
pub struct AutoMappingDatabase {
    entries: Vec<(&'static AutoJoyMapping, Option<Regex>)>,
}

impl AutoMappingDatabase {
    /// Compile a table; entries whose pattern does not compile never match
    pub fn new(mappings: &'static [AutoJoyMapping]) -> Self {
        let entries = mappings
            .iter()
            .map(|mapping| {
                let regex = match Regex::new(mapping.driver_regex) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        warn!(
                            "Ignoring auto-mapping for {}: bad driver pattern {:?}: {}",
                            mapping.controller_name, mapping.driver_regex, e
                        );
                        None
                    }
                };
                (mapping, regex)
            })
            .collect();

        Self { entries }
    }

    /// The built-in controller table, compiled on first use
    pub fn builtin() -> &'static AutoMappingDatabase {
        static DATABASE: OnceLock<AutoMappingDatabase> = OnceLock::new();
        DATABASE.get_or_init(|| Self::new(AUTO_JOY_MAPPINGS))
    }

    /// Entries for `game` whose pattern matches `description`, in table order
    pub fn matching<'a>(
        &'a self,
        game: &'a str,
        description: &'a str,
    ) -> impl Iterator<Item = &'static AutoJoyMapping> + 'a {
        self.entries
            .iter()
            .filter(move |(mapping, _)| mapping.game.eq_ignore_ascii_case(game))
            .filter(move |(_, regex)| regex.as_ref().is_some_and(|r| r.is_match(description)))
            .map(|(mapping, _)| *mapping)
    }
}

const fn b(n: u8) -> DeviceButton {
    DeviceButton::JoyButton(n)
}

const LEFT: DeviceButton = DeviceButton::JoyAxis(JoyAxis::Left);
const RIGHT: DeviceButton = DeviceButton::JoyAxis(JoyAxis::Right);
const UP: DeviceButton = DeviceButton::JoyAxis(JoyAxis::Up);
const DOWN: DeviceButton = DeviceButton::JoyAxis(JoyAxis::Down);
const HAT_LEFT: DeviceButton = DeviceButton::JoyHat(JoyHat::Left);
const HAT_RIGHT: DeviceButton = DeviceButton::JoyHat(JoyHat::Right);
const HAT_UP: DeviceButton = DeviceButton::JoyHat(JoyHat::Up);
const HAT_DOWN: DeviceButton = DeviceButton::JoyHat(JoyHat::Down);

const fn m(button: DeviceButton, game_button: GameButton) -> InputMapping {
    InputMapping::new(button, game_button)
}

const fn m2(button: DeviceButton, game_button: GameButton) -> InputMapping {
    InputMapping::second(button, game_button)
}

/// Known controllers. Within one entry a repeated game button fills the next slot.
pub static AUTO_JOY_MAPPINGS: &[AutoJoyMapping] = &[
    AutoJoyMapping {
        game: "dance",
        driver_regex: "GIC USB Joystick",
        controller_name: "Boom USB convertor (black/gray)",
        maps: &[
            m(b(16), dance::LEFT),
            m(b(14), dance::RIGHT),
            m(b(13), dance::UP),
            m(b(15), dance::DOWN),
            m(b(4), dance::LEFT),
            m(b(2), dance::RIGHT),
            m(b(1), dance::UP),
            m(b(3), dance::DOWN),
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(9), GameButton::BACK),
            m(b(12), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "4 axis 16 button joystick",
        controller_name: "EMS USB2",
        maps: &[
            m(b(16), dance::LEFT),
            m(b(14), dance::RIGHT),
            m(b(13), dance::UP),
            m(b(15), dance::DOWN),
            m(b(4), dance::LEFT),
            m(b(2), dance::RIGHT),
            m(b(1), dance::UP),
            m(b(3), dance::DOWN),
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        // the trailing space is part of the reported name
        driver_regex: "GamePad Pro USB ",
        controller_name: "GamePad Pro USB",
        maps: &[
            m(LEFT, dance::LEFT),
            m(RIGHT, dance::RIGHT),
            m(UP, dance::UP),
            m(DOWN, dance::DOWN),
            m(b(1), dance::LEFT),
            m(b(3), dance::RIGHT),
            m(b(4), dance::UP),
            m(b(2), dance::DOWN),
            m(b(5), dance::UP_LEFT),
            m(b(6), dance::UP_RIGHT),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "SideWinder Game Pad USB version 1.0",
        controller_name: "SideWinder Game Pad USB",
        maps: &[
            m(LEFT, dance::LEFT),
            m(RIGHT, dance::RIGHT),
            m(UP, dance::UP),
            m(DOWN, dance::DOWN),
            m(b(4), dance::LEFT),
            m(b(2), dance::RIGHT),
            m(b(5), dance::UP),
            m(b(1), dance::DOWN),
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "4 axis 12 button joystick with hat switch",
        controller_name: "Super Joy Box 5",
        maps: &[
            m(LEFT, dance::LEFT),
            m(RIGHT, dance::RIGHT),
            m(UP, dance::UP),
            m(DOWN, dance::DOWN),
            m(b(4), dance::LEFT),
            m(b(2), dance::RIGHT),
            m(b(1), dance::UP),
            m(b(3), dance::DOWN),
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(10), GameButton::BACK),
            m(b(9), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "MP-8866 Dual USB Joypad",
        controller_name: "Super Dual Box (from DDRGame.com, Feb 2008)",
        maps: &[
            m(b(3), dance::UP),
            m(b(2), dance::DOWN),
            m(b(1), dance::LEFT),
            m(b(4), dance::RIGHT),
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(10), GameButton::BACK),
            m(b(9), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "NTPAD",
        controller_name: "NTPAD",
        maps: &[
            m(b(13), dance::LEFT),
            m(b(15), dance::RIGHT),
            m(b(16), dance::UP),
            m(b(14), dance::DOWN),
            m(b(1), dance::LEFT),
            m(b(3), dance::RIGHT),
            m(b(4), dance::UP),
            m(b(2), dance::DOWN),
            m(b(5), dance::UP_LEFT),
            m(b(6), dance::UP_RIGHT),
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "Psx Gamepad",
        controller_name: "PSXPAD",
        maps: &[
            m(LEFT, dance::LEFT),
            m(RIGHT, dance::RIGHT),
            m(UP, dance::UP),
            m(DOWN, dance::DOWN),
            m(b(2), dance::LEFT),
            m(b(1), dance::RIGHT),
            m(b(4), dance::UP),
            m(b(3), dance::DOWN),
            m(b(7), dance::UP_LEFT),
            m(b(5), dance::UP_RIGHT),
            m(b(8), dance::UP_LEFT),
            m(b(6), dance::UP_RIGHT),
            m(b(10), GameButton::BACK),
            m(b(9), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "XBOX Gamepad Plugin V0.01",
        controller_name: "X-Box gamepad",
        maps: &[
            m(LEFT, dance::LEFT),
            m(RIGHT, dance::RIGHT),
            m(UP, dance::UP),
            m(DOWN, dance::DOWN),
            m(b(1), dance::DOWN),  // A
            m(b(2), dance::RIGHT), // B
            m(b(3), dance::LEFT),  // X
            m(b(4), dance::UP),    // Y
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(9), GameButton::START),
            m(b(10), GameButton::BACK),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        // no model string on Linux, only vendor and product ids
        driver_regex: "0b43:0003",
        controller_name: "EMS USB2",
        maps: &[
            m(b(16), dance::LEFT),
            m(b(14), dance::RIGHT),
            m(b(13), dance::UP),
            m(b(15), dance::DOWN),
            m(b(4), dance::LEFT),
            m(b(2), dance::RIGHT),
            m(b(1), dance::UP),
            m(b(3), dance::DOWN),
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(9), GameButton::SELECT),
            m(b(10), GameButton::START),
            m(b(5), GameButton::BACK),
            m(b(6), GameButton::COIN),
            m2(b(32), dance::LEFT),
            m2(b(30), dance::RIGHT),
            m2(b(29), dance::UP),
            m2(b(31), dance::DOWN),
            m2(b(20), dance::LEFT),
            m2(b(18), dance::RIGHT),
            m2(b(17), dance::UP),
            m2(b(19), dance::DOWN),
            m2(b(23), dance::UP_RIGHT),
            m2(b(24), dance::UP_LEFT),
            m2(b(25), GameButton::SELECT),
            m2(b(26), GameButton::START),
            m2(b(21), GameButton::BACK),
            m2(b(22), GameButton::COIN),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "Dance ",
        controller_name: "LevelSix USB Pad (DDR638)",
        maps: &[
            m(b(1), dance::UP),
            m(b(2), dance::DOWN),
            m(b(3), dance::LEFT),
            m(b(4), dance::RIGHT),
            m(b(7), dance::UP_RIGHT),
            m(b(8), dance::UP_LEFT),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "SmartJoy PLUS Adapter",
        controller_name: "SmartJoy PLUS Adapter",
        maps: &[
            m(LEFT, dance::LEFT),
            m(RIGHT, dance::RIGHT),
            m(UP, dance::UP),
            m(DOWN, dance::DOWN),
            m(b(4), dance::LEFT),  // square
            m(b(2), dance::RIGHT), // circle
            m(b(1), dance::UP),    // triangle
            m(b(3), dance::DOWN),  // cross
            m(b(7), dance::UP_LEFT),
            m(b(8), dance::UP_RIGHT),
            m(b(10), GameButton::BACK),
            m(b(9), GameButton::START),
            m(b(5), GameButton::SELECT),
            m(b(6), GameButton::COIN),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        // Ignition 3 and newer Afterburners report the first name, older ones the second
        driver_regex: "RedOctane USB Pad|XBOX DDR",
        controller_name: "RedOctane Ignition 3 or Afterburner",
        maps: &[
            m(b(1), dance::LEFT),
            m(b(4), dance::RIGHT),
            m(b(3), dance::UP),
            m(b(2), dance::DOWN),
            m(b(8), GameButton::START),
            m(b(9), GameButton::START),
            m(b(10), GameButton::BACK),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "Joypad to USB converter",
        controller_name: "EMS Trio Linker",
        maps: &[
            m(b(16), dance::LEFT),
            m(b(14), dance::RIGHT),
            m(b(13), dance::UP),
            m(b(15), dance::DOWN),
            m(b(2), GameButton::START),
            m(b(10), GameButton::START),
            m(b(9), GameButton::BACK),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "Positive Gaming Impact USB pad",
        controller_name: "Positive Gaming Impact USB pad",
        maps: &[
            m(b(1), dance::LEFT),
            m(b(4), dance::RIGHT),
            m(b(3), dance::UP),
            m(b(2), dance::DOWN),
            m(b(8), GameButton::START),
            m(b(9), GameButton::START),
            m(b(10), GameButton::BACK),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "USB Dance Pad",
        controller_name: "DDRGame Energy Dance Pad",
        maps: &[
            m(b(13), dance::UP),
            m(b(15), dance::DOWN),
            m(b(16), dance::LEFT),
            m(b(14), dance::RIGHT),
            m(b(3), dance::UP_LEFT),
            m(b(2), dance::UP_RIGHT),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: "Dual USB Vibration Joystick",
        controller_name: "PC Multi Hub Double Power Box 4",
        maps: &[
            m(b(13), dance::UP),
            m(b(15), dance::DOWN),
            m(b(16), dance::LEFT),
            m(b(14), dance::RIGHT),
            m(b(3), dance::UP_LEFT),
            m(b(2), dance::UP_RIGHT),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "dance",
        driver_regex: r"Controller \(Harmonix Drum Kit for Xbox 360\)",
        controller_name: "Rock Band drum controller (Xbox 360, Windows driver)",
        maps: &[
            m(b(3), dance::UP),    // blue drum
            m(b(4), dance::DOWN),  // yellow drum
            m(b(2), dance::LEFT),  // red drum
            m(b(1), dance::RIGHT), // green drum
            m(HAT_LEFT, GameButton::MENU_LEFT),
            m(HAT_RIGHT, GameButton::MENU_RIGHT),
            m(HAT_UP, GameButton::MENU_UP),
            m(HAT_DOWN, GameButton::MENU_DOWN),
            m(b(8), GameButton::START),
            m(b(7), GameButton::BACK),
        ],
    },
    AutoJoyMapping {
        game: "pump",
        driver_regex: "Pump USB",
        controller_name: "Pump USB pad",
        maps: &[
            m(b(1), pump::UP_LEFT),
            m(b(2), pump::UP_RIGHT),
            m(b(3), pump::CENTER),
            m(b(4), pump::DOWN_LEFT),
            m(b(5), pump::DOWN_RIGHT),
            m(b(6), GameButton::BACK),
            m2(b(7), pump::UP_LEFT),
            m2(b(8), pump::UP_RIGHT),
            m2(b(9), pump::CENTER),
            m2(b(10), pump::DOWN_LEFT),
            m2(b(11), pump::DOWN_RIGHT),
        ],
    },
    AutoJoyMapping {
        game: "pump",
        driver_regex: "GamePad Pro USB ",
        controller_name: "GamePad Pro USB",
        maps: &[
            m(b(5), pump::UP_LEFT),
            m(b(6), pump::UP_RIGHT),
            m(b(7), pump::DOWN_LEFT),
            m(b(8), pump::DOWN_RIGHT),
            m(LEFT, GameButton::MENU_LEFT),
            m(RIGHT, GameButton::MENU_RIGHT),
            m(UP, GameButton::MENU_UP),
            m(DOWN, GameButton::MENU_DOWN),
            m(b(1), pump::CENTER),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
    AutoJoyMapping {
        game: "pump",
        driver_regex: r"Controller \(Harmonix Drum Kit for Xbox 360\)",
        controller_name: "Rock Band drum controller (Xbox 360, Windows driver)",
        maps: &[
            m(b(5), pump::CENTER),     // bass pedal
            m(b(3), pump::UP_RIGHT),   // blue drum
            m(b(4), pump::UP_LEFT),    // yellow drum
            m(b(2), pump::DOWN_LEFT),  // red drum
            m(b(1), pump::DOWN_RIGHT), // green drum
            m(HAT_LEFT, GameButton::MENU_LEFT),
            m(HAT_RIGHT, GameButton::MENU_RIGHT),
            m(HAT_UP, GameButton::MENU_UP),
            m(HAT_DOWN, GameButton::MENU_DOWN),
            m(b(8), GameButton::START),
            m(b(7), GameButton::BACK),
        ],
    },
    AutoJoyMapping {
        game: "para",
        driver_regex: "ParaParaParadise Controller",
        controller_name: "ParaParaParadise Controller",
        maps: &[
            m(b(5), para::LEFT),
            m(b(4), para::UP_LEFT),
            m(b(3), para::UP),
            m(b(2), para::UP_RIGHT),
            m(b(1), para::RIGHT),
            m(b(10), GameButton::START),
            m(b(11), GameButton::BACK),
            m(b(12), GameButton::MENU_LEFT),
            m(b(9), GameButton::MENU_RIGHT),
        ],
    },
    AutoJoyMapping {
        game: "techno",
        driver_regex: "Dance ",
        controller_name: "LevelSix USB Pad (DDR638)",
        maps: &[
            m(b(1), techno::UP),
            m(b(2), techno::DOWN),
            m(b(3), techno::LEFT),
            m(b(4), techno::RIGHT),
            m(b(5), techno::DOWN_RIGHT),
            m(b(6), techno::DOWN_LEFT),
            m(b(7), techno::UP_RIGHT),
            m(b(8), techno::UP_LEFT),
            m(b(9), GameButton::BACK),
            m(b(10), GameButton::START),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::scheme::{InputScheme, BUILTIN_SCHEMES};

    #[test]
    fn test_all_builtin_patterns_compile() {
        for mapping in AUTO_JOY_MAPPINGS {
            assert!(
                Regex::new(mapping.driver_regex).is_ok(),
                "bad pattern for {}",
                mapping.controller_name
            );
        }
        assert_eq!(
            AutoMappingDatabase::builtin().entries.len(),
            AUTO_JOY_MAPPINGS.len()
        );
    }

    #[test]
    fn test_every_entry_names_a_builtin_scheme() {
        for mapping in AUTO_JOY_MAPPINGS {
            let scheme = InputScheme::find(mapping.game).expect("unknown game");
            for map in mapping.maps {
                assert!(map.game_button.index() < scheme.buttons_per_controller());
                assert!(map.device_button.is_valid());
                assert!(!map.device_button.is_key());
            }
        }
        assert_eq!(BUILTIN_SCHEMES.len(), 4);
    }

    #[test]
    fn test_match_by_game_and_description() {
        let db = AutoMappingDatabase::builtin();

        let found: Vec<_> = db
            .matching("dance", "GIC USB Joystick")
            .map(|m| m.controller_name)
            .collect();
        assert_eq!(found, vec!["Boom USB convertor (black/gray)"]);

        assert_eq!(db.matching("pump", "GIC USB Joystick").count(), 0);
        assert_eq!(db.matching("DANCE", "GIC USB Joystick").count(), 1);
    }

    #[test]
    fn test_pattern_search_is_unanchored() {
        let db = AutoMappingDatabase::builtin();
        assert_eq!(db.matching("dance", "Generic XBOX DDR pad").count(), 1);
        assert_eq!(db.matching("dance", "RedOctane USB Pad").count(), 1);
        assert_eq!(
            db.matching("pump", "Controller (Harmonix Drum Kit for Xbox 360)")
                .count(),
            1
        );
    }

    #[test]
    fn test_trailing_space_matters() {
        let db = AutoMappingDatabase::builtin();
        assert_eq!(db.matching("dance", "GamePad Pro USB").count(), 0);
        assert_eq!(db.matching("dance", "GamePad Pro USB ").count(), 1);
    }

    static BROKEN: &[AutoJoyMapping] = &[AutoJoyMapping {
        game: "dance",
        driver_regex: "(unclosed",
        controller_name: "Broken",
        maps: &[],
    }];

    #[test]
    fn test_bad_pattern_never_matches() {
        let db = AutoMappingDatabase::new(BROKEN);
        assert_eq!(db.entries.len(), 1);
        assert_eq!(db.matching("dance", "(unclosed").count(), 0);
    }
}
