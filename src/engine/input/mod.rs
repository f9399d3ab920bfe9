// Input mapping system
//
// Translates physical device inputs (keys, joystick buttons, axes, hats) into
// per-player logical game inputs, persists user keymaps and applies factory
// mappings to known controllers when they are plugged in.
//
// ## Architecture
//
// - `device`: Physical inputs and their text tokens
// - `action`: Logical game inputs and generic default key bindings
// - `scheme`: Per-game-mode button sets and default bindings
// - `auto_map`: Known controller database
// - `player`: Players and multiplayer slots
// - `driver`: Device driver, notification and localization services
// - `config`: Keymap and preference persistence
// - `hotplug`: Device list change detection
// - `manager`: The input mapper owning the mapping table
// - `query`: Pressed/held/level queries through the mapping table
//
// ## Usage Example
//
// ```rust
// use engine::input::{FileStorage, InputMapper, LogSink, scheme::DANCE};
//
// let mut mapper = InputMapper::new(&DANCE, Box::new(FileStorage::new("Save")), Box::new(LogSink));
//
// // Once per frame, or when the driver reports a device change
// if let Some(change) = mapper.check_for_changed_input_devices_and_remap(&driver) {
//     show_message(&change.message);
// }
//
// if mapper.is_menu_button_pressed(GameButton::START, Some(PlayerNumber::P1), &driver) {
//     // Player 1 is holding start
// }
// ```

pub mod action;
pub mod auto_map;
pub mod config;
pub mod device;
pub mod driver;
pub mod hotplug;
pub mod manager;
pub mod player;
pub mod query;
pub mod scheme;

// Re-export commonly used types
pub use action::{GameButton, GameController, GameInput, InputMapping};
pub use config::{FileStorage, InputPrefs, Keymaps, MappingStorage, MemoryStorage};
pub use device::{DeviceButton, DeviceInput, InputDevice, InputDeviceInfo, Key};
pub use driver::{InputDriver, LogSink, Message, NotificationSink, VirtualDriver};
pub use hotplug::DeviceChange;
pub use manager::InputMapper;
pub use player::{MultiPlayer, PlayerNumber};
pub use scheme::InputScheme;

/// Input mapping errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Invalid device input: {0:?}")]
    InvalidDeviceInput(String),

    #[error("Unknown input scheme: {0}")]
    UnknownScheme(String),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
