// Input queries - Pressed, held and level state of game inputs
//
// Every query fans out over the slots of a game input and asks the driver
// about each mapped device input. Pressed is true if any slot is pressed,
// held time and analog level take the largest value.

use super::action::{GameButton, GameInput};
use super::device::DeviceInput;
use super::driver::InputDriver;
use super::manager::{InputMapper, NUM_GAME_TO_DEVICE_SLOTS};
use super::player::{MultiPlayer, PlayerNumber};

impl InputMapper {
    /// Device inputs mapped to a game input, moved onto a multiplayer's joystick if given
    fn slot_inputs(
        &self,
        game_input: GameInput,
        multi_player: Option<MultiPlayer>,
    ) -> Vec<DeviceInput> {
        (0..NUM_GAME_TO_DEVICE_SLOTS)
            .filter_map(|slot| self.game_to_device(game_input, slot))
            .map(|mut device_input| {
                if let Some(multi_player) = multi_player {
                    device_input.device = multi_player.input_device();
                }
                device_input
            })
            .collect()
    }

    pub fn is_being_pressed(
        &self,
        game_input: GameInput,
        multi_player: Option<MultiPlayer>,
        driver: &dyn InputDriver,
    ) -> bool {
        self.slot_inputs(game_input, multi_player)
            .into_iter()
            .any(|device_input| driver.is_being_pressed(device_input))
    }

    /// Whether any game input performing a menu action is pressed
    pub fn is_menu_button_pressed(
        &self,
        menu_button: GameButton,
        player: Option<PlayerNumber>,
        driver: &dyn InputDriver,
    ) -> bool {
        self.menu_to_game(menu_button, player)
            .into_iter()
            .any(|game_input| self.is_being_pressed(game_input, None, driver))
    }

    /// Longest time any slot of a game input has been held
    pub fn secs_held(
        &self,
        game_input: GameInput,
        multi_player: Option<MultiPlayer>,
        driver: &dyn InputDriver,
    ) -> f32 {
        self.slot_inputs(game_input, multi_player)
            .into_iter()
            .map(|device_input| driver.secs_held(device_input))
            .fold(0.0, f32::max)
    }

    pub fn menu_secs_held(
        &self,
        menu_button: GameButton,
        player: Option<PlayerNumber>,
        driver: &dyn InputDriver,
    ) -> f32 {
        self.menu_to_game(menu_button, player)
            .into_iter()
            .map(|game_input| self.secs_held(game_input, None, driver))
            .fold(0.0, f32::max)
    }

    /// Highest analog level over the slots of a game input
    pub fn level(&self, game_input: GameInput, driver: &dyn InputDriver) -> f32 {
        self.slot_inputs(game_input, None)
            .into_iter()
            .map(|device_input| driver.level(device_input))
            .fold(0.0, f32::max)
    }

    pub fn menu_level(
        &self,
        menu_button: GameButton,
        player: Option<PlayerNumber>,
        driver: &dyn InputDriver,
    ) -> f32 {
        self.menu_to_game(menu_button, player)
            .into_iter()
            .map(|game_input| self.level(game_input, driver))
            .fold(0.0, f32::max)
    }

    /// Stop key repeats on every device input of a game input
    pub fn repeat_stop_key(&self, game_input: GameInput, driver: &mut dyn InputDriver) {
        for device_input in self.slot_inputs(game_input, None) {
            driver.repeat_stop_key(device_input);
        }
    }

    pub fn menu_repeat_stop_key(
        &self,
        menu_button: GameButton,
        player: Option<PlayerNumber>,
        driver: &mut dyn InputDriver,
    ) {
        for game_input in self.menu_to_game(menu_button, player) {
            self.repeat_stop_key(game_input, driver);
        }
    }

    /// Restart the repeat timer on every device input of a game input
    pub fn reset_key_repeat(&self, game_input: GameInput, driver: &mut dyn InputDriver) {
        for device_input in self.slot_inputs(game_input, None) {
            driver.reset_key_repeat(device_input);
        }
    }

    pub fn menu_reset_key_repeat(
        &self,
        menu_button: GameButton,
        player: Option<PlayerNumber>,
        driver: &mut dyn InputDriver,
    ) {
        for game_input in self.menu_to_game(menu_button, player) {
            self.reset_key_repeat(game_input, driver);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::action::GameController;
    use crate::engine::input::config::MemoryStorage;
    use crate::engine::input::device::{DeviceButton, JoyAxis, Key};
    use crate::engine::input::driver::{LogSink, VirtualDriver};
    use crate::engine::input::scheme::{dance, DANCE};
    use approx::assert_relative_eq;

    fn mapper() -> InputMapper {
        InputMapper::new(&DANCE, Box::new(MemoryStorage::new()), Box::new(LogSink))
    }

    fn p1(button: GameButton) -> GameInput {
        GameInput::new(GameController::Controller1, button)
    }

    fn p2(button: GameButton) -> GameInput {
        GameInput::new(GameController::Controller2, button)
    }

    fn joy(index: u8, button: u8) -> DeviceInput {
        DeviceInput::joystick(index, DeviceButton::JoyButton(button))
    }

    #[test]
    fn test_pressed_on_any_slot() {
        let mut mapper = mapper();
        mapper.set_input_map(joy(0, 16), p1(dance::LEFT), 0);
        mapper.set_input_map(joy(0, 4), p1(dance::LEFT), 1);

        let mut driver = VirtualDriver::new();
        assert!(!mapper.is_being_pressed(p1(dance::LEFT), None, &driver));

        driver.press(joy(0, 4), 0.1);
        assert!(mapper.is_being_pressed(p1(dance::LEFT), None, &driver));
        assert!(!mapper.is_being_pressed(p2(dance::LEFT), None, &driver));

        // the keyboard default in the reserved slot counts too
        driver.release(joy(0, 4));
        driver.press(DeviceInput::key(Key::Left), 0.1);
        assert!(mapper.is_being_pressed(p1(dance::LEFT), None, &driver));
    }

    #[test]
    fn test_unmapped_input_is_idle() {
        let mapper = mapper();
        let driver = VirtualDriver::new();
        let game_input = p2(dance::UP_LEFT);

        assert!(!mapper.is_being_pressed(game_input, None, &driver));
        assert_relative_eq!(mapper.secs_held(game_input, None, &driver), 0.0);
        assert_relative_eq!(mapper.level(game_input, &driver), 0.0);
        assert!(!mapper.is_being_pressed(GameInput::INVALID, None, &driver));
    }

    #[test]
    fn test_secs_held_and_level_take_max() {
        let mut mapper = mapper();
        let axis_up = DeviceInput::joystick(0, DeviceButton::JoyAxis(JoyAxis::Up));
        mapper.set_input_map(joy(0, 1), p1(dance::UP), 0);
        mapper.set_input_map(axis_up, p1(dance::UP), 1);

        let mut driver = VirtualDriver::new();
        driver.press(joy(0, 1), 0.25);
        driver.press_analog(axis_up, 1.5, 0.4);

        assert_relative_eq!(mapper.secs_held(p1(dance::UP), None, &driver), 1.5);
        assert_relative_eq!(mapper.level(p1(dance::UP), &driver), 1.0);
    }

    #[test]
    fn test_multi_player_reads_own_joystick() {
        let mut mapper = mapper();
        mapper.set_input_map(joy(0, 16), p1(dance::LEFT), 0);

        let mut driver = VirtualDriver::new();
        driver.press(joy(3, 16), 0.5);

        assert!(!mapper.is_being_pressed(p1(dance::LEFT), None, &driver));
        assert!(mapper.is_being_pressed(p1(dance::LEFT), Some(MultiPlayer(3)), &driver));
        assert_relative_eq!(
            mapper.secs_held(p1(dance::LEFT), Some(MultiPlayer(3)), &driver),
            0.5
        );
        assert!(!mapper.is_being_pressed(p1(dance::LEFT), Some(MultiPlayer(2)), &driver));
    }

    #[test]
    fn test_menu_button_queries() {
        let mapper = mapper();
        let mut driver = VirtualDriver::new();

        // enter starts for player 1, keypad enter for player 2
        driver.press(DeviceInput::key(Key::KpEnter), 2.0);
        assert!(mapper.is_menu_button_pressed(GameButton::START, None, &driver));
        assert!(mapper.is_menu_button_pressed(GameButton::START, Some(PlayerNumber::P2), &driver));
        assert!(!mapper.is_menu_button_pressed(GameButton::START, Some(PlayerNumber::P1), &driver));
        assert_relative_eq!(
            mapper.menu_secs_held(GameButton::START, Some(PlayerNumber::P2), &driver),
            2.0
        );
        assert_relative_eq!(
            mapper.menu_secs_held(GameButton::START, Some(PlayerNumber::P1), &driver),
            0.0
        );
    }

    #[test]
    fn test_menu_queries_include_game_buttons() {
        let mapper = mapper();
        let mut driver = VirtualDriver::new();

        // the left arrow is bound to dance Left, which doubles as menu left
        driver.press_analog(DeviceInput::key(Key::Left), 0.3, 0.75);
        assert!(mapper.is_menu_button_pressed(
            GameButton::MENU_LEFT,
            Some(PlayerNumber::P1),
            &driver
        ));
        assert_relative_eq!(
            mapper.menu_level(GameButton::MENU_LEFT, Some(PlayerNumber::P1), &driver),
            0.75
        );
    }

    #[test]
    fn test_joined_controllers_share_menu_buttons() {
        let mut mapper = mapper();
        let mut driver = VirtualDriver::new();
        driver.press(DeviceInput::key(Key::KpEnter), 0.1);

        assert!(!mapper.is_menu_button_pressed(GameButton::START, Some(PlayerNumber::P1), &driver));
        mapper.set_join_controllers(Some(PlayerNumber::P1));
        assert!(mapper.is_menu_button_pressed(GameButton::START, Some(PlayerNumber::P1), &driver));
    }

    #[test]
    fn test_key_repeat_forwarding() {
        let mut mapper = mapper();
        mapper.set_input_map(joy(0, 12), p1(GameButton::START), 0);

        let mut driver = VirtualDriver::new();
        mapper.repeat_stop_key(p1(GameButton::START), &mut driver);
        assert!(driver.is_repeat_stopped(joy(0, 12)));
        assert!(driver.is_repeat_stopped(DeviceInput::key(Key::Enter)));

        mapper.reset_key_repeat(p1(GameButton::START), &mut driver);
        assert_eq!(
            driver.repeat_resets(),
            &[joy(0, 12), DeviceInput::key(Key::Enter)]
        );
    }

    #[test]
    fn test_menu_key_repeat_forwarding() {
        let mapper = mapper();
        let mut driver = VirtualDriver::new();

        mapper.menu_repeat_stop_key(GameButton::BACK, Some(PlayerNumber::P2), &mut driver);
        assert!(driver.is_repeat_stopped(DeviceInput::key(Key::NumLock)));
        assert!(!driver.is_repeat_stopped(DeviceInput::key(Key::Escape)));

        mapper.menu_reset_key_repeat(GameButton::BACK, None, &mut driver);
        assert_eq!(
            driver.repeat_resets(),
            &[DeviceInput::key(Key::Escape), DeviceInput::key(Key::NumLock)]
        );
    }
}
