// Joystick list change detection

use super::driver::{InputDriver, Localizer};

const STRINGS_SECTION: &str = "InputMapper";

/// Outcome of a device check that found the joystick list changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceChange {
    /// Joysticks present now but not at the last check
    pub connected: Vec<String>,
    /// Joysticks present at the last check but gone now
    pub disconnected: Vec<String>,
    /// Summary for the user, localized
    pub message: String,
}

/// Current device descriptions compared against the last seen list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceScan {
    /// Every current description, in enumeration order
    pub all: Vec<String>,
    /// Current joystick descriptions, in enumeration order
    pub joysticks: Vec<String>,
    /// The last seen list with current non-joystick descriptions removed
    pub last_seen_joysticks: Vec<String>,
}

impl DeviceScan {
    /// Enumerate the driver's devices against the last seen descriptions
    pub fn new(driver: &dyn InputDriver, last_seen: Vec<String>) -> Self {
        let mut scan = Self {
            last_seen_joysticks: last_seen,
            ..Self::default()
        };

        for device in driver.devices() {
            if driver.is_joystick(device.id) {
                scan.joysticks.push(device.description.clone());
            } else if let Some(pos) = scan
                .last_seen_joysticks
                .iter()
                .position(|d| *d == device.description)
            {
                scan.last_seen_joysticks.remove(pos);
            }
            scan.all.push(device.description);
        }

        scan
    }

    /// Exact sequence comparison: the same joysticks in another order count as a change
    pub fn joysticks_changed(&self) -> bool {
        self.joysticks != self.last_seen_joysticks
    }

    /// Split into (connected, disconnected) descriptions
    pub fn connects_disconnects(&self) -> (Vec<String>, Vec<String>) {
        let connected = self
            .joysticks
            .iter()
            .filter(|d| !self.last_seen_joysticks.contains(d))
            .cloned()
            .collect();
        let disconnected = self
            .last_seen_joysticks
            .iter()
            .filter(|d| !self.joysticks.contains(d))
            .cloned()
            .collect();
        (connected, disconnected)
    }
}

/// Build the user-facing summary of a device change
pub fn change_message(
    localizer: &dyn Localizer,
    connected: &[String],
    disconnected: &[String],
    auto_mapping: bool,
) -> String {
    let mut message = String::new();
    if !connected.is_empty() {
        message.push_str(&format!(
            "{}: {}\n",
            localizer.localize(STRINGS_SECTION, "Connected"),
            connected.join("\n")
        ));
    }
    if !disconnected.is_empty() {
        message.push_str(&format!(
            "{}: {}\n",
            localizer.localize(STRINGS_SECTION, "Disconnected"),
            disconnected.join("\n")
        ));
    }
    if auto_mapping {
        message.push_str(&localizer.localize(STRINGS_SECTION, "Auto-mapping all joysticks."));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::InputDevice;
    use crate::engine::input::driver::{EnglishStrings, VirtualDriver};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scan_splits_joysticks() {
        let mut driver = VirtualDriver::new();
        driver.connect(InputDevice::Keyboard, "Keyboard");
        driver.connect(InputDevice::Joystick(0), "Pad A");

        let scan = DeviceScan::new(&driver, names(&["Pad A", "Keyboard"]));
        assert_eq!(scan.all, names(&["Keyboard", "Pad A"]));
        assert_eq!(scan.joysticks, names(&["Pad A"]));
        assert_eq!(scan.last_seen_joysticks, names(&["Pad A"]));
        assert!(!scan.joysticks_changed());
    }

    #[test]
    fn test_connect_detected() {
        let mut driver = VirtualDriver::new();
        for (i, name) in ["A", "B", "C"].iter().enumerate() {
            driver.connect(InputDevice::Joystick(i as u8), *name);
        }

        let scan = DeviceScan::new(&driver, names(&["A", "B"]));
        assert!(scan.joysticks_changed());
        assert_eq!(scan.connects_disconnects(), (names(&["C"]), vec![]));
    }

    #[test]
    fn test_disconnect_detected() {
        let mut driver = VirtualDriver::new();
        driver.connect(InputDevice::Joystick(0), "B");

        let scan = DeviceScan::new(&driver, names(&["A", "B"]));
        assert!(scan.joysticks_changed());
        assert_eq!(scan.connects_disconnects(), (vec![], names(&["A"])));
    }

    #[test]
    fn test_reordering_counts_as_change() {
        let mut driver = VirtualDriver::new();
        driver.connect(InputDevice::Joystick(0), "B");
        driver.connect(InputDevice::Joystick(1), "A");

        let scan = DeviceScan::new(&driver, names(&["A", "B"]));
        assert!(scan.joysticks_changed());
        assert_eq!(scan.connects_disconnects(), (vec![], vec![]));
    }

    #[test]
    fn test_change_message() {
        let message = change_message(&EnglishStrings, &names(&["C"]), &names(&["A", "B"]), true);
        assert_eq!(
            message,
            "Connected: C\nDisconnected: A\nB\nAuto-mapping all joysticks."
        );

        let quiet = change_message(&EnglishStrings, &names(&["C"]), &[], false);
        assert_eq!(quiet, "Connected: C\n");
    }
}
