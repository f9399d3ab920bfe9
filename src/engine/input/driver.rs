// Services the mapper depends on: device driver, notifications and strings

use super::device::{DeviceInput, InputDevice, InputDeviceInfo};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Low-level device state, as polled by the platform input driver
pub trait InputDriver {
    /// Connected devices with their reported descriptions, in driver order
    fn devices(&self) -> Vec<InputDeviceInfo>;

    /// Whether a device is a joystick (only joysticks are auto-mapped)
    fn is_joystick(&self, device: InputDevice) -> bool {
        device.is_joystick()
    }

    fn is_being_pressed(&self, input: DeviceInput) -> bool;

    /// Seconds the input has been held, zero when released
    fn secs_held(&self, input: DeviceInput) -> f32;

    /// Analog level in 0.0..=1.0
    fn level(&self, input: DeviceInput) -> f32;

    /// Stop generating repeat events until the input is pressed again
    fn repeat_stop_key(&mut self, input: DeviceInput);

    /// Restart the repeat timer for a held input
    fn reset_key_repeat(&mut self, input: DeviceInput);
}

/// Events the mapper broadcasts to the rest of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Joystick auto-mappings were re-applied after a device change
    AutoJoyMappingApplied,
}

impl Message {
    pub fn name(self) -> &'static str {
        match self {
            Self::AutoJoyMappingApplied => "AutoJoyMappingApplied",
        }
    }
}

/// Receiver of broadcast messages, typically the UI layer
pub trait NotificationSink {
    fn broadcast(&mut self, message: Message);
}

/// Sink that only logs; used when nothing listens
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn broadcast(&mut self, message: Message) {
        debug!("Broadcast {}", message.name());
    }
}

/// Localized string lookup
pub trait Localizer {
    fn localize(&self, section: &str, key: &str) -> String;
}

/// Built-in English strings; unknown keys are returned as-is
#[derive(Debug, Default)]
pub struct EnglishStrings;

impl Localizer for EnglishStrings {
    fn localize(&self, _section: &str, key: &str) -> String {
        key.to_string()
    }
}

/// Held state of one input on a virtual device
#[derive(Debug, Clone, Copy, Default)]
struct HeldInput {
    secs_held: f32,
    level: f32,
}

/// In-memory driver with scripted devices and held inputs
///
/// Stands in for a platform driver in tools and tests.
#[derive(Debug, Default)]
pub struct VirtualDriver {
    devices: Vec<InputDeviceInfo>,
    held: HashMap<DeviceInput, HeldInput>,
    repeat_stopped: HashSet<DeviceInput>,
    repeat_resets: Vec<DeviceInput>,
}

impl VirtualDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug in a device at the end of the enumeration order
    pub fn connect(&mut self, id: InputDevice, description: impl Into<String>) {
        self.devices.push(InputDeviceInfo::new(id, description));
    }

    /// Unplug a device and release everything held on it
    pub fn disconnect(&mut self, id: InputDevice) {
        self.devices.retain(|d| d.id != id);
        self.held.retain(|input, _| input.device != id);
    }

    /// Hold an input fully down for the given time
    pub fn press(&mut self, input: DeviceInput, secs_held: f32) {
        self.press_analog(input, secs_held, 1.0);
    }

    /// Hold an input at a partial analog level
    pub fn press_analog(&mut self, input: DeviceInput, secs_held: f32, level: f32) {
        self.held.insert(input, HeldInput { secs_held, level });
        self.repeat_stopped.remove(&input);
    }

    pub fn release(&mut self, input: DeviceInput) {
        self.held.remove(&input);
    }

    /// Whether repeats were stopped for this input since it was last pressed
    pub fn is_repeat_stopped(&self, input: DeviceInput) -> bool {
        self.repeat_stopped.contains(&input)
    }

    /// Inputs whose repeat timer was reset, in call order
    pub fn repeat_resets(&self) -> &[DeviceInput] {
        &self.repeat_resets
    }
}

impl InputDriver for VirtualDriver {
    fn devices(&self) -> Vec<InputDeviceInfo> {
        self.devices.clone()
    }

    fn is_being_pressed(&self, input: DeviceInput) -> bool {
        self.held.contains_key(&input)
    }

    fn secs_held(&self, input: DeviceInput) -> f32 {
        self.held.get(&input).map(|h| h.secs_held).unwrap_or(0.0)
    }

    fn level(&self, input: DeviceInput) -> f32 {
        self.held.get(&input).map(|h| h.level).unwrap_or(0.0)
    }

    fn repeat_stop_key(&mut self, input: DeviceInput) {
        self.repeat_stopped.insert(input);
    }

    fn reset_key_repeat(&mut self, input: DeviceInput) {
        self.repeat_resets.push(input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::{DeviceButton, Key};
    use approx::assert_relative_eq;

    #[test]
    fn test_virtual_driver_devices_keep_order() {
        let mut driver = VirtualDriver::new();
        driver.connect(InputDevice::Keyboard, "Keyboard");
        driver.connect(InputDevice::Joystick(0), "Pad A");
        driver.connect(InputDevice::Joystick(1), "Pad B");
        driver.disconnect(InputDevice::Joystick(0));

        let names: Vec<_> = driver.devices().into_iter().map(|d| d.description).collect();
        assert_eq!(names, vec!["Keyboard", "Pad B"]);
    }

    #[test]
    fn test_virtual_driver_held_state() {
        let mut driver = VirtualDriver::new();
        let input = DeviceInput::joystick(0, DeviceButton::JoyButton(3));

        assert!(!driver.is_being_pressed(input));
        assert_relative_eq!(driver.secs_held(input), 0.0);

        driver.press_analog(input, 0.5, 0.25);
        assert!(driver.is_being_pressed(input));
        assert_relative_eq!(driver.secs_held(input), 0.5);
        assert_relative_eq!(driver.level(input), 0.25);

        driver.disconnect(InputDevice::Joystick(0));
        assert!(!driver.is_being_pressed(input));
    }

    #[test]
    fn test_repeat_stop_clears_on_next_press() {
        let mut driver = VirtualDriver::new();
        let input = DeviceInput::key(Key::Enter);

        driver.repeat_stop_key(input);
        assert!(driver.is_repeat_stopped(input));

        driver.press(input, 0.0);
        assert!(!driver.is_repeat_stopped(input));
    }

    #[test]
    fn test_default_joystick_classification() {
        let driver = VirtualDriver::new();
        assert!(driver.is_joystick(InputDevice::Joystick(2)));
        assert!(!driver.is_joystick(InputDevice::Keyboard));
    }

    #[test]
    fn test_english_strings_echo_key() {
        assert_eq!(
            EnglishStrings.localize("InputMapper", "Connected"),
            "Connected"
        );
    }
}
