// Persisted keymaps and input preferences

use super::InputError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default keymap file name inside the settings directory
pub const KEYMAPS_FILE: &str = "Keymaps.toml";

/// Default preferences file name inside the settings directory
pub const PREFERENCES_FILE: &str = "Preferences.toml";

/// Separator between the per-slot device tokens of one keymap value
pub const DEVICE_INPUT_SEPARATOR: char = ':';

/// Section store of key/value strings, one section per input scheme
///
/// Keys are game input names (`Left`, `Left_P2`, ...), values are device
/// input tokens joined with `DEVICE_INPUT_SEPARATOR`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keymaps {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Keymaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse keymaps from TOML text
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(name)
    }

    /// Replace a whole section
    pub fn set_section(&mut self, name: impl Into<String>, entries: BTreeMap<String, String>) {
        self.sections.insert(name.into(), entries);
    }

    pub fn remove_section(&mut self, name: &str) -> Option<BTreeMap<String, String>> {
        self.sections.remove(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn insert(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }
}

/// Input preferences kept between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPrefs {
    /// Comma-joined descriptions of the devices seen at the last check
    #[serde(default)]
    pub last_seen_input_devices: String,
    #[serde(default = "default_auto_map_on_joy_change")]
    pub auto_map_on_joy_change: bool,
    /// Only the common buttons act as menu buttons
    #[serde(default)]
    pub only_dedicated_menu_buttons: bool,
}

fn default_auto_map_on_joy_change() -> bool {
    true
}

impl Default for InputPrefs {
    fn default() -> Self {
        Self {
            last_seen_input_devices: String::new(),
            auto_map_on_joy_change: default_auto_map_on_joy_change(),
            only_dedicated_menu_buttons: false,
        }
    }
}

impl InputPrefs {
    /// The last seen device descriptions, split back into a list
    pub fn last_seen_devices(&self) -> Vec<String> {
        self.last_seen_input_devices
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn set_last_seen_devices(&mut self, descriptions: &[String]) {
        self.last_seen_input_devices = descriptions.join(",");
    }
}

/// Where keymaps and preferences are persisted
pub trait MappingStorage {
    fn read_keymaps(&self) -> Result<Keymaps>;
    fn write_keymaps(&mut self, keymaps: &Keymaps) -> Result<()>;
    fn read_prefs(&self) -> Result<InputPrefs>;
    fn write_prefs(&mut self, prefs: &InputPrefs) -> Result<()>;
}

/// TOML files on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    keymaps_path: PathBuf,
    prefs_path: PathBuf,
}

impl FileStorage {
    /// Use the default file names inside a settings directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::with_paths(dir.join(KEYMAPS_FILE), dir.join(PREFERENCES_FILE))
    }

    pub fn with_paths<P: AsRef<Path>, Q: AsRef<Path>>(keymaps_path: P, prefs_path: Q) -> Self {
        Self {
            keymaps_path: keymaps_path.as_ref().to_path_buf(),
            prefs_path: prefs_path.as_ref().to_path_buf(),
        }
    }

    pub fn keymaps_path(&self) -> &Path {
        &self.keymaps_path
    }

    pub fn prefs_path(&self) -> &Path {
        &self.prefs_path
    }

    fn read(path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| {
            InputError::Io {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }

    fn write(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| InputError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| {
            InputError::Io {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }
}

impl MappingStorage for FileStorage {
    fn read_keymaps(&self) -> Result<Keymaps> {
        let content = Self::read(&self.keymaps_path)?;
        let keymaps = Keymaps::from_toml(&content).map_err(|source| InputError::Parse {
            path: self.keymaps_path.display().to_string(),
            source,
        })?;
        Ok(keymaps)
    }

    fn write_keymaps(&mut self, keymaps: &Keymaps) -> Result<()> {
        let content = format!(
            "# Input mappings, one table per game scheme.\n\
             # Values list device inputs per slot, separated by '{}'.\n\n{}",
            DEVICE_INPUT_SEPARATOR,
            keymaps.to_toml().map_err(InputError::from)?
        );
        Self::write(&self.keymaps_path, &content)
    }

    /// A missing preferences file yields the defaults
    fn read_prefs(&self) -> Result<InputPrefs> {
        if !self.prefs_path.exists() {
            return Ok(InputPrefs::default());
        }
        let content = Self::read(&self.prefs_path)?;
        let prefs = toml::from_str(&content).map_err(|source| InputError::Parse {
            path: self.prefs_path.display().to_string(),
            source,
        })?;
        Ok(prefs)
    }

    fn write_prefs(&mut self, prefs: &InputPrefs) -> Result<()> {
        let content = toml::to_string(prefs).map_err(InputError::from)?;
        Self::write(&self.prefs_path, &content)
    }
}

/// Storage that never touches the disk
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    keymaps: Keymaps,
    prefs: InputPrefs,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keymaps(keymaps: Keymaps) -> Self {
        Self {
            keymaps,
            prefs: InputPrefs::default(),
        }
    }
}

impl MappingStorage for MemoryStorage {
    fn read_keymaps(&self) -> Result<Keymaps> {
        Ok(self.keymaps.clone())
    }

    fn write_keymaps(&mut self, keymaps: &Keymaps) -> Result<()> {
        self.keymaps = keymaps.clone();
        Ok(())
    }

    fn read_prefs(&self) -> Result<InputPrefs> {
        Ok(self.prefs.clone())
    }

    fn write_prefs(&mut self, prefs: &InputPrefs) -> Result<()> {
        self.prefs = prefs.clone();
        Ok(())
    }
}
