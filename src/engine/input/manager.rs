// Input mapper - Owns the physical to logical mapping table

use super::action::{
    GameButton, GameController, GameInput, InputMapping, DEFAULT_KEY_MAPPINGS, MAX_GAME_BUTTONS,
    NUM_GAME_CONTROLLERS,
};
use super::auto_map::AutoMappingDatabase;
use super::config::{InputPrefs, Keymaps, MappingStorage, DEVICE_INPUT_SEPARATOR};
use super::device::{DeviceInput, InputDevice};
use super::driver::{EnglishStrings, InputDriver, Localizer, Message, NotificationSink};
use super::hotplug::{change_message, DeviceChange, DeviceScan};
use super::player::{MultiPlayer, PlayerNumber};
use super::scheme::InputScheme;
use anyhow::Result;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};

/// Device inputs that can drive one game input at the same time
pub const NUM_GAME_TO_DEVICE_SLOTS: usize = 5;

/// Slots the user can edit; these are the ones persisted
pub const NUM_USER_GAME_TO_DEVICE_SLOTS: usize = 4;

/// Slot holding the keyboard defaults, never persisted
pub const DEFAULT_MAPPING_SLOT: usize = NUM_USER_GAME_TO_DEVICE_SLOTS;

type MappingTable =
    [[[DeviceInput; NUM_GAME_TO_DEVICE_SLOTS]; MAX_GAME_BUTTONS]; NUM_GAME_CONTROLLERS];

const EMPTY_TABLE: MappingTable =
    [[[DeviceInput::INVALID; NUM_GAME_TO_DEVICE_SLOTS]; MAX_GAME_BUTTONS]; NUM_GAME_CONTROLLERS];

/// Maps physical device inputs to logical game inputs for the active scheme
///
/// The forward table is the source of truth. The reverse index is rebuilt
/// from it after every mutation, so `device_to_game` always agrees with
/// `game_to_device` once a call returns.
pub struct InputMapper {
    /// Active game scheme
    scheme: &'static InputScheme,

    /// [controller][button][slot] -> device input
    table: MappingTable,

    /// device input -> game input, derived from `table`
    reverse: HashMap<DeviceInput, GameInput>,

    storage: Box<dyn MappingStorage>,
    sink: Box<dyn NotificationSink>,
    localizer: Box<dyn Localizer>,

    prefs: InputPrefs,

    /// When set, both controllers act for this player
    join_controllers: Option<PlayerNumber>,
}

impl InputMapper {
    /// Create a mapper for a scheme and load its mappings from storage
    pub fn new(
        scheme: &'static InputScheme,
        storage: Box<dyn MappingStorage>,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        let prefs = storage.read_prefs().unwrap_or_else(|e| {
            warn!("Failed to read input preferences, using defaults: {:#}", e);
            InputPrefs::default()
        });

        let mut mapper = Self {
            scheme,
            table: EMPTY_TABLE,
            reverse: HashMap::new(),
            storage,
            sink,
            localizer: Box::new(EnglishStrings),
            prefs,
            join_controllers: None,
        };
        mapper.read_mappings();
        mapper
    }

    /// Replace the strings used for device change messages
    pub fn set_localizer(&mut self, localizer: Box<dyn Localizer>) {
        self.localizer = localizer;
    }

    pub fn input_scheme(&self) -> &'static InputScheme {
        self.scheme
    }

    /// Switch to another scheme, replacing the whole table with its stored mappings
    pub fn set_input_scheme(&mut self, scheme: &'static InputScheme) {
        info!("Switching input scheme to {}", scheme.name);
        self.scheme = scheme;
        self.read_mappings();
    }

    fn cell(&self, game_input: GameInput, slot: usize) -> Option<&DeviceInput> {
        let controller = game_input.controller.index()?;
        self.table
            .get(controller)?
            .get(game_input.button.index())?
            .get(slot)
    }

    fn cell_mut(&mut self, game_input: GameInput, slot: usize) -> Option<&mut DeviceInput> {
        let controller = game_input.controller.index()?;
        self.table
            .get_mut(controller)?
            .get_mut(game_input.button.index())?
            .get_mut(slot)
    }

    /// Bind a device input to one slot of a game input
    ///
    /// The device input is removed from any other cell first. Panics if the
    /// controller, button or slot is out of range.
    pub fn set_input_map(&mut self, device_input: DeviceInput, game_input: GameInput, slot: usize) {
        assert!(game_input.controller.is_valid(), "Invalid controller in {:?}", game_input);
        assert!(game_input.button.is_valid(), "Invalid button in {:?}", game_input);
        assert!(slot < NUM_GAME_TO_DEVICE_SLOTS, "Slot {} out of range", slot);

        self.remove_device_input(device_input);
        if let Some(cell) = self.cell_mut(game_input, slot) {
            *cell = device_input;
        }
        self.update_reverse_index();
    }

    /// Remove a device input from every cell holding it
    pub fn clear_device_input(&mut self, device_input: DeviceInput) {
        self.remove_device_input(device_input);
        self.update_reverse_index();
    }

    fn remove_device_input(&mut self, device_input: DeviceInput) {
        for cell in self.table.iter_mut().flatten().flatten() {
            if *cell == device_input {
                *cell = DeviceInput::INVALID;
            }
        }
    }

    /// Clear one cell; false when the game input or the cell was already invalid
    pub fn clear_game_input(&mut self, game_input: GameInput, slot: usize) -> bool {
        if !game_input.is_valid() {
            return false;
        }
        match self.cell_mut(game_input, slot) {
            Some(cell) if cell.is_valid() => *cell = DeviceInput::INVALID,
            _ => return false,
        }
        self.update_reverse_index();
        true
    }

    /// Remove everything mapped from a device in the user slots
    pub fn unmap(&mut self, device: InputDevice) {
        for slots in self.table.iter_mut().flatten() {
            for cell in slots.iter_mut().take(NUM_USER_GAME_TO_DEVICE_SLOTS) {
                if cell.device == device {
                    *cell = DeviceInput::INVALID;
                }
            }
        }
        self.update_reverse_index();
    }

    pub fn clear_all_mappings(&mut self) {
        self.table = EMPTY_TABLE;
        self.update_reverse_index();
    }

    fn update_reverse_index(&mut self) {
        self.reverse.clear();
        for (controller, buttons) in self.table.iter().enumerate() {
            for (button, slots) in buttons.iter().enumerate() {
                let game_input = GameInput::new(
                    GameController::from_index(controller),
                    GameButton(button as u8),
                );
                for device_input in slots.iter().filter(|d| d.is_valid()) {
                    self.reverse.insert(*device_input, game_input);
                }
            }
        }
    }

    pub fn is_mapped(&self, device_input: DeviceInput) -> bool {
        self.reverse.contains_key(&device_input)
    }

    pub fn device_to_game(&self, device_input: DeviceInput) -> Option<GameInput> {
        self.reverse.get(&device_input).copied()
    }

    pub fn game_to_device(&self, game_input: GameInput, slot: usize) -> Option<DeviceInput> {
        self.cell(game_input, slot)
            .copied()
            .filter(|device_input| device_input.is_valid())
    }

    /// Valid device inputs of a game input, with their slots
    pub fn mappings_for(&self, game_input: GameInput) -> Vec<(usize, DeviceInput)> {
        (0..NUM_GAME_TO_DEVICE_SLOTS)
            .filter_map(|slot| Some((slot, self.game_to_device(game_input, slot)?)))
            .collect()
    }

    /// Fill the default slot with generic and scheme key defaults
    ///
    /// Scheme defaults win over generic ones for the same key, and keys the
    /// user already mapped are left alone.
    pub fn add_default_mappings_for_current_game_if_unmapped(&mut self) {
        for slots in self.table.iter_mut().flatten() {
            slots[DEFAULT_MAPPING_SLOT] = DeviceInput::INVALID;
        }
        self.update_reverse_index();

        let candidates: Vec<InputMapping> = DEFAULT_KEY_MAPPINGS
            .iter()
            .chain(self.scheme.default_mappings)
            .rev()
            .copied()
            .collect();

        for mapping in candidates {
            let device_input = DeviceInput::new(InputDevice::Keyboard, mapping.device_button);
            if self.is_mapped(device_input) {
                continue;
            }
            let controller = if mapping.second_controller {
                GameController::Controller2
            } else {
                GameController::Controller1
            };
            self.set_input_map(
                device_input,
                GameInput::new(controller, mapping.game_button),
                DEFAULT_MAPPING_SLOT,
            );
        }
    }

    /// Reload the table from storage, then apply the defaults
    pub fn read_mappings(&mut self) {
        self.clear_all_mappings();

        let keymaps = self.storage.read_keymaps().unwrap_or_else(|e| {
            warn!("No stored input mappings loaded: {:#}", e);
            Keymaps::new()
        });

        if let Some(section) = keymaps.section(self.scheme.name) {
            for (name, value) in section {
                let game_input = GameInput::from_name(self.scheme, name);
                if !game_input.is_valid() {
                    debug!("Skipping unknown {} input {:?}", self.scheme.name, name);
                    continue;
                }

                let tokens = value
                    .split(DEVICE_INPUT_SEPARATOR)
                    .take(NUM_USER_GAME_TO_DEVICE_SLOTS);
                for (slot, token) in tokens.enumerate() {
                    let device_input = DeviceInput::parse_or_invalid(token);
                    if device_input.is_valid() {
                        self.set_input_map(device_input, game_input, slot);
                    }
                }
            }
        }

        self.add_default_mappings_for_current_game_if_unmapped();
    }

    /// Write the user slots of the active scheme to storage
    pub fn save_mappings(&mut self) -> Result<()> {
        let mut keymaps = self.storage.read_keymaps().unwrap_or_else(|e| {
            debug!("Starting new keymaps: {:#}", e);
            Keymaps::new()
        });
        keymaps.remove_section(self.scheme.name);

        let separator = DEVICE_INPUT_SEPARATOR.to_string();
        let mut section = BTreeMap::new();
        for controller in GameController::ALL {
            for button in self.scheme.game_buttons() {
                let game_input = GameInput::new(controller, button);
                let mut tokens: Vec<String> = (0..NUM_USER_GAME_TO_DEVICE_SLOTS)
                    .map(|slot| {
                        self.game_to_device(game_input, slot)
                            .map(|d| d.to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                while tokens.last().is_some_and(|t| t.is_empty()) {
                    tokens.pop();
                }
                section.insert(game_input.to_name(self.scheme), tokens.join(&separator));
            }
        }
        keymaps.set_section(self.scheme.name, section);

        self.storage.write_keymaps(&keymaps)?;
        debug!("Saved {} input mappings", self.scheme.name);
        Ok(())
    }

    /// Apply factory mappings to every recognized controller
    ///
    /// Controllers are assigned in enumeration order. Returns how many
    /// controllers were mapped.
    pub fn auto_map_joysticks_for_current_game(&mut self, driver: &dyn InputDriver) -> usize {
        let database = AutoMappingDatabase::builtin();
        let mut num_mapped = 0;

        for device in driver.devices() {
            for mapping in database.matching(self.scheme.name, &device.description) {
                let controller = GameController::from_index(num_mapped);
                if !controller.is_valid() {
                    break;
                }

                info!(
                    "Applying default joystick mapping #{} for device '{}' ({})",
                    num_mapped + 1,
                    device.description,
                    mapping.controller_name
                );
                self.unmap(device.id);
                self.apply_mapping(mapping.maps, controller, device.id);
                num_mapped += 1;
            }
        }

        num_mapped
    }

    /// Bind a list of device buttons on one device to a controller
    ///
    /// Repeated game inputs take successive slots. Pairs for the next
    /// controller are dropped when there is none.
    pub fn apply_mapping(
        &mut self,
        maps: &[InputMapping],
        controller: GameController,
        device: InputDevice,
    ) {
        let mut next_slot: HashMap<GameInput, usize> = HashMap::new();

        for mapping in maps {
            let target = if mapping.second_controller {
                controller.next()
            } else {
                controller
            };
            let game_input = GameInput::new(target, mapping.game_button);
            if !game_input.is_valid() {
                continue;
            }

            let slot = next_slot.entry(game_input).or_insert(0);
            if *slot >= NUM_USER_GAME_TO_DEVICE_SLOTS {
                continue;
            }
            let current = *slot;
            *slot += 1;

            self.set_input_map(
                DeviceInput::new(device, mapping.device_button),
                game_input,
                current,
            );
        }
    }

    /// Detect joysticks coming and going since the last check
    ///
    /// Returns `None` when the joystick list is unchanged. Otherwise
    /// re-applies auto-mappings if enabled and records the new device list.
    pub fn check_for_changed_input_devices_and_remap(
        &mut self,
        driver: &dyn InputDriver,
    ) -> Option<DeviceChange> {
        let scan = DeviceScan::new(driver, self.prefs.last_seen_devices());
        if !scan.joysticks_changed() {
            return None;
        }

        let (connected, disconnected) = scan.connects_disconnects();
        let auto_map = self.prefs.auto_map_on_joy_change;
        let message = change_message(self.localizer.as_ref(), &connected, &disconnected, auto_map);

        if auto_map {
            self.auto_map_joysticks_for_current_game(driver);
            if let Err(e) = self.save_mappings() {
                warn!("Failed to save input mappings: {:#}", e);
            }
            self.sink.broadcast(Message::AutoJoyMappingApplied);
        }

        info!("{}", message);

        self.prefs.set_last_seen_devices(&scan.all);
        if let Err(e) = self.save_prefs() {
            warn!("Failed to save input preferences: {:#}", e);
        }

        Some(DeviceChange {
            connected,
            disconnected,
            message,
        })
    }

    pub fn prefs(&self) -> &InputPrefs {
        &self.prefs
    }

    /// Preferences for editing; call `save_prefs` to persist them
    pub fn prefs_mut(&mut self) -> &mut InputPrefs {
        &mut self.prefs
    }

    pub fn save_prefs(&mut self) -> Result<()> {
        self.storage.write_prefs(&self.prefs)
    }

    /// Make both controllers act for one player, or `None` to separate them
    pub fn set_join_controllers(&mut self, player: Option<PlayerNumber>) {
        self.join_controllers = player;
    }

    pub fn join_controllers(&self) -> Option<PlayerNumber> {
        self.join_controllers
    }

    pub fn controller_to_player(&self, controller: GameController) -> Option<PlayerNumber> {
        match self.join_controllers {
            Some(player) if controller.is_valid() => Some(player),
            _ => PlayerNumber::from_controller(controller),
        }
    }

    pub fn game_button_to_menu_button(&self, button: GameButton) -> GameButton {
        self.scheme
            .game_button_to_menu_button(button, self.prefs.only_dedicated_menu_buttons)
    }

    /// Game inputs performing a menu action for a player, or for everyone
    ///
    /// While controllers are joined, both controllers count for the player.
    pub fn menu_to_game(
        &self,
        menu_button: GameButton,
        player: Option<PlayerNumber>,
    ) -> Vec<GameInput> {
        let player = if self.join_controllers.is_some() {
            None
        } else {
            player
        };
        self.scheme.menu_button_to_game_inputs(
            menu_button,
            player,
            self.prefs.only_dedicated_menu_buttons,
        )
    }

    pub fn multi_player_to_input_device(&self, multi_player: MultiPlayer) -> InputDevice {
        multi_player.input_device()
    }

    pub fn input_device_to_multi_player(&self, device: InputDevice) -> Option<MultiPlayer> {
        MultiPlayer::from_input_device(device)
    }
}

impl Drop for InputMapper {
    fn drop(&mut self) {
        if let Err(e) = self.save_mappings() {
            warn!("Failed to save input mappings on shutdown: {:#}", e);
        }
    }
}
