// Players, multiplayer slots and their relation to controllers and devices

use super::action::GameController;
use super::device::{InputDevice, NUM_JOYSTICKS};

/// A player side
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlayerNumber {
    P1,
    P2,
}

impl PlayerNumber {
    /// The controller a player normally reads from
    pub fn controller(self) -> GameController {
        match self {
            Self::P1 => GameController::Controller1,
            Self::P2 => GameController::Controller2,
        }
    }

    /// The player a controller belongs to when controllers are not joined
    pub fn from_controller(controller: GameController) -> Option<Self> {
        match controller {
            GameController::Controller1 => Some(Self::P1),
            GameController::Controller2 => Some(Self::P2),
            GameController::Invalid => None,
        }
    }
}

/// One of the many-player slots, each bound to its own joystick
///
/// In multiplayer modes every player uses the same logical controller and is
/// told apart only by the physical joystick they stand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MultiPlayer(pub u8);

impl MultiPlayer {
    pub const P1: MultiPlayer = MultiPlayer(0);

    /// The joystick this slot reads from
    pub fn input_device(self) -> InputDevice {
        InputDevice::joystick(self.0)
    }

    /// The slot a joystick belongs to, `None` for anything else
    pub fn from_input_device(device: InputDevice) -> Option<Self> {
        match device {
            InputDevice::Joystick(index) if index < NUM_JOYSTICKS => Some(Self(index)),
            _ => None,
        }
    }
}
