// Physical input identities: devices, buttons and their text tokens

use super::InputError;
use std::fmt;
use std::str::FromStr;

/// Number of joystick devices the driver can report
pub const NUM_JOYSTICKS: u8 = 32;

/// Number of buttons addressable on a single joystick
pub const NUM_JOYSTICK_BUTTONS: u8 = 32;

/// Highest numbered function key
const NUM_FUNCTION_KEYS: u8 = 12;

/// A physical input device as reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputDevice {
    Keyboard,
    /// Zero-based joystick index, below `NUM_JOYSTICKS`
    Joystick(u8),
    Invalid,
}

impl InputDevice {
    /// Joystick device for a zero-based index, `Invalid` when out of range
    pub fn joystick(index: u8) -> Self {
        if index < NUM_JOYSTICKS {
            Self::Joystick(index)
        } else {
            Self::Invalid
        }
    }

    pub fn is_valid(self) -> bool {
        match self {
            Self::Keyboard => true,
            Self::Joystick(index) => index < NUM_JOYSTICKS,
            Self::Invalid => false,
        }
    }

    pub fn is_joystick(self) -> bool {
        matches!(self, Self::Joystick(index) if index < NUM_JOYSTICKS)
    }
}

impl fmt::Display for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyboard => f.write_str("Key"),
            Self::Joystick(index) => write!(f, "Joy{}", u16::from(*index) + 1),
            Self::Invalid => Ok(()),
        }
    }
}

impl FromStr for InputDevice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("key") {
            return Ok(Self::Keyboard);
        }

        let number = s
            .strip_prefix("Joy")
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=NUM_JOYSTICKS).contains(n))
            .ok_or_else(|| InputError::InvalidDeviceInput(s.to_string()))?;

        Ok(Self::Joystick(number - 1))
    }
}

/// A keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// A printable key, stored lowercase
    Char(char),
    Enter,
    Escape,
    Space,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Left,
    Right,
    Up,
    Down,
    /// Function key, F1..F12
    F(u8),
    /// Numeric keypad digit, KP0..KP9
    Kp(u8),
    KpEnter,
    KpSlash,
    KpAsterisk,
    KpHyphen,
    KpPlus,
    KpPeriod,
    NumLock,
    ScrollLock,
    CapsLock,
    Pause,
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
}

/// Token names for keys without a numeric or character payload
const NAMED_KEYS: &[(Key, &str)] = &[
    (Key::Enter, "enter"),
    (Key::Escape, "escape"),
    (Key::Space, "space"),
    (Key::Tab, "tab"),
    (Key::Backspace, "backspace"),
    (Key::Delete, "delete"),
    (Key::Insert, "insert"),
    (Key::Home, "home"),
    (Key::End, "end"),
    (Key::PageUp, "pgup"),
    (Key::PageDown, "pgdn"),
    (Key::Left, "left"),
    (Key::Right, "right"),
    (Key::Up, "up"),
    (Key::Down, "down"),
    (Key::KpEnter, "KPenter"),
    (Key::KpSlash, "KP/"),
    (Key::KpAsterisk, "KP*"),
    (Key::KpHyphen, "KP-"),
    (Key::KpPlus, "KP+"),
    (Key::KpPeriod, "KP."),
    (Key::NumLock, "NumLock"),
    (Key::ScrollLock, "ScrollLock"),
    (Key::CapsLock, "CapsLock"),
    (Key::Pause, "pause"),
    (Key::LeftShift, "lshift"),
    (Key::RightShift, "rshift"),
    (Key::LeftCtrl, "lctrl"),
    (Key::RightCtrl, "rctrl"),
    (Key::LeftAlt, "lalt"),
    (Key::RightAlt, "ralt"),
];

impl Key {
    /// Printable character key; the character is folded to lowercase
    pub fn char(c: char) -> Self {
        Self::Char(c.to_ascii_lowercase())
    }

    pub fn is_valid(self) -> bool {
        match self {
            // ':' separates tokens in the keymap store
            Self::Char(c) => c.is_ascii_graphic() && c != ':' && !c.is_ascii_uppercase(),
            Self::F(n) => (1..=NUM_FUNCTION_KEYS).contains(&n),
            Self::Kp(n) => n <= 9,
            _ => true,
        }
    }

    fn name(self) -> Option<&'static str> {
        NAMED_KEYS
            .iter()
            .find(|(key, _)| *key == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c),
            Self::F(n) => write!(f, "F{}", n),
            Self::Kp(n) => write!(f, "KP{}", n),
            other => f.write_str(other.name().unwrap_or_default()),
        }
    }
}

impl FromStr for Key {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidDeviceInput(s.to_string());

        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let key = Self::char(c);
            return if key.is_valid() { Ok(key) } else { Err(invalid()) };
        }

        if let Some((key, _)) = NAMED_KEYS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*key);
        }

        let numbered = |prefix: &str| {
            s.get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .and_then(|_| s.get(prefix.len()..))
                .and_then(|n| n.parse::<u8>().ok())
        };

        let key = if let Some(n) = numbered("KP") {
            Self::Kp(n)
        } else if let Some(n) = numbered("F") {
            Self::F(n)
        } else {
            return Err(invalid());
        };

        if key.is_valid() {
            Ok(key)
        } else {
            Err(invalid())
        }
    }
}

/// Joystick axis directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JoyAxis {
    Left,
    Right,
    Up,
    Down,
    Left2,
    Right2,
    Up2,
    Down2,
    ZUp,
    ZDown,
}

const AXIS_NAMES: &[(JoyAxis, &str)] = &[
    (JoyAxis::Left, "Left"),
    (JoyAxis::Right, "Right"),
    (JoyAxis::Up, "Up"),
    (JoyAxis::Down, "Down"),
    (JoyAxis::Left2, "Left2"),
    (JoyAxis::Right2, "Right2"),
    (JoyAxis::Up2, "Up2"),
    (JoyAxis::Down2, "Down2"),
    (JoyAxis::ZUp, "ZUp"),
    (JoyAxis::ZDown, "ZDown"),
];

/// Hat switch directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JoyHat {
    Left,
    Right,
    Up,
    Down,
}

const HAT_NAMES: &[(JoyHat, &str)] = &[
    (JoyHat::Left, "HatLeft"),
    (JoyHat::Right, "HatRight"),
    (JoyHat::Up, "HatUp"),
    (JoyHat::Down, "HatDown"),
];

/// A button, key, axis direction or hat direction on some device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceButton {
    Key(Key),
    JoyAxis(JoyAxis),
    JoyHat(JoyHat),
    /// One-based joystick button number
    JoyButton(u8),
    Invalid,
}

impl DeviceButton {
    pub fn is_valid(self) -> bool {
        match self {
            Self::Key(key) => key.is_valid(),
            Self::JoyButton(n) => (1..=NUM_JOYSTICK_BUTTONS).contains(&n),
            Self::JoyAxis(_) | Self::JoyHat(_) => true,
            Self::Invalid => false,
        }
    }

    pub fn is_key(self) -> bool {
        matches!(self, Self::Key(_))
    }
}

impl fmt::Display for DeviceButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::JoyAxis(axis) => {
                let name = AXIS_NAMES
                    .iter()
                    .find(|(a, _)| a == axis)
                    .map(|(_, name)| *name)
                    .unwrap_or_default();
                f.write_str(name)
            }
            Self::JoyHat(hat) => {
                let name = HAT_NAMES
                    .iter()
                    .find(|(h, _)| h == hat)
                    .map(|(_, name)| *name)
                    .unwrap_or_default();
                f.write_str(name)
            }
            Self::JoyButton(n) => write!(f, "B{}", n),
            Self::Invalid => Ok(()),
        }
    }
}

/// A specific input on a specific device
///
/// This is the key of the reverse lookup table, so it is cheap to copy and
/// totally ordered. `DeviceInput::INVALID` marks an empty mapping cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceInput {
    pub device: InputDevice,
    pub button: DeviceButton,
}

impl DeviceInput {
    pub const INVALID: DeviceInput = DeviceInput {
        device: InputDevice::Invalid,
        button: DeviceButton::Invalid,
    };

    pub fn new(device: InputDevice, button: DeviceButton) -> Self {
        Self { device, button }
    }

    /// A key on the keyboard
    pub fn key(key: Key) -> Self {
        Self::new(InputDevice::Keyboard, DeviceButton::Key(key))
    }

    /// A button, axis or hat on a zero-based joystick
    pub fn joystick(index: u8, button: DeviceButton) -> Self {
        Self::new(InputDevice::joystick(index), button)
    }

    /// Valid when both halves are valid and the button kind fits the device
    pub fn is_valid(&self) -> bool {
        if !self.device.is_valid() || !self.button.is_valid() {
            return false;
        }
        self.button.is_key() == (self.device == InputDevice::Keyboard)
    }

    /// Parse a token, falling back to `INVALID` for anything malformed
    pub fn parse_or_invalid(token: &str) -> Self {
        token.parse().unwrap_or(Self::INVALID)
    }
}

impl Default for DeviceInput {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for DeviceInput {
    /// Invalid inputs are written as an empty token
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}_{}", self.device, self.button)
    }
}

impl FromStr for DeviceInput {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidDeviceInput(s.to_string());

        let (device, button) = s.split_once('_').ok_or_else(invalid)?;
        let device: InputDevice = device.parse().map_err(|_| invalid())?;

        let button = match device {
            InputDevice::Keyboard => DeviceButton::Key(button.parse().map_err(|_| invalid())?),
            _ => parse_joystick_button(button).ok_or_else(invalid)?,
        };

        let input = Self::new(device, button);
        if input.is_valid() {
            Ok(input)
        } else {
            Err(invalid())
        }
    }
}

fn parse_joystick_button(s: &str) -> Option<DeviceButton> {
    if let Some((axis, _)) = AXIS_NAMES.iter().find(|(_, name)| *name == s) {
        return Some(DeviceButton::JoyAxis(*axis));
    }
    if let Some((hat, _)) = HAT_NAMES.iter().find(|(_, name)| *name == s) {
        return Some(DeviceButton::JoyHat(*hat));
    }
    s.strip_prefix('B')
        .and_then(|n| n.parse::<u8>().ok())
        .map(DeviceButton::JoyButton)
        .filter(|button| button.is_valid())
}

/// A device with the description string its driver reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeviceInfo {
    pub id: InputDevice,
    pub description: String,
}

impl InputDeviceInfo {
    pub fn new(id: InputDevice, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_tokens() {
        assert_eq!(DeviceInput::key(Key::char('a')).to_string(), "Key_a");
        assert_eq!(DeviceInput::key(Key::Enter).to_string(), "Key_enter");
        assert_eq!(DeviceInput::key(Key::Kp(4)).to_string(), "Key_KP4");
        assert_eq!(DeviceInput::key(Key::F(1)).to_string(), "Key_F1");
        assert_eq!(DeviceInput::key(Key::char('_')).to_string(), "Key__");
    }

    #[test]
    fn test_joystick_tokens() {
        let button = DeviceInput::joystick(0, DeviceButton::JoyButton(16));
        assert_eq!(button.to_string(), "Joy1_B16");

        let axis = DeviceInput::joystick(1, DeviceButton::JoyAxis(JoyAxis::Left));
        assert_eq!(axis.to_string(), "Joy2_Left");

        let hat = DeviceInput::joystick(2, DeviceButton::JoyHat(JoyHat::Down));
        assert_eq!(hat.to_string(), "Joy3_HatDown");
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!(
            "Key_KPenter".parse::<DeviceInput>().unwrap(),
            DeviceInput::key(Key::KpEnter)
        );
        assert_eq!(
            "Key__".parse::<DeviceInput>().unwrap(),
            DeviceInput::key(Key::Char('_'))
        );
        assert_eq!(
            "Joy32_B32".parse::<DeviceInput>().unwrap(),
            DeviceInput::joystick(31, DeviceButton::JoyButton(32))
        );
        assert_eq!(
            "Joy4_ZDown".parse::<DeviceInput>().unwrap(),
            DeviceInput::joystick(3, DeviceButton::JoyAxis(JoyAxis::ZDown))
        );
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        for token in [
            "", "Key", "Key_", "Joy0_B1", "Joy33_B1", "Joy1_B0", "Joy1_B33", "Joy1_a",
            "Key_B1", "Mouse_left", "Key_F13", "Key_KP10", "Key_:",
        ] {
            assert!(token.parse::<DeviceInput>().is_err(), "{:?} should not parse", token);
            assert_eq!(DeviceInput::parse_or_invalid(token), DeviceInput::INVALID);
        }
    }

    #[test]
    fn test_invalid_serializes_empty() {
        assert_eq!(DeviceInput::INVALID.to_string(), "");
        assert!(!DeviceInput::INVALID.is_valid());
        assert_eq!(DeviceInput::default(), DeviceInput::INVALID);
    }

    #[test]
    fn test_device_kind_must_match_button_kind() {
        let key_on_joystick =
            DeviceInput::new(InputDevice::Joystick(0), DeviceButton::Key(Key::Up));
        assert!(!key_on_joystick.is_valid());

        let button_on_keyboard =
            DeviceInput::new(InputDevice::Keyboard, DeviceButton::JoyButton(1));
        assert!(!button_on_keyboard.is_valid());
    }

    #[test]
    fn test_uppercase_char_folds() {
        assert_eq!(Key::char('Q'), Key::Char('q'));
        assert_eq!(
            "Key_Q".parse::<DeviceInput>().unwrap(),
            DeviceInput::key(Key::Char('q'))
        );
    }

    #[test]
    fn test_ordering_is_total() {
        let mut inputs = vec![
            DeviceInput::joystick(1, DeviceButton::JoyButton(1)),
            DeviceInput::key(Key::char('z')),
            DeviceInput::joystick(0, DeviceButton::JoyButton(2)),
        ];
        inputs.sort();
        assert_eq!(inputs[0].device, InputDevice::Keyboard);
        assert_eq!(inputs[1].device, InputDevice::Joystick(0));
        assert_eq!(inputs[2].device, InputDevice::Joystick(1));
    }

    #[test]
    fn test_joystick_index_range() {
        assert_eq!(InputDevice::joystick(31), InputDevice::Joystick(31));
        assert_eq!(InputDevice::joystick(32), InputDevice::Invalid);
        assert!(InputDevice::Joystick(5).is_joystick());
        assert!(!InputDevice::Keyboard.is_joystick());
    }
}
