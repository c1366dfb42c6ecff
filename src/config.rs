use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::de::Deserializer;
use serde::Deserialize;

use crate::layout::SectionDef;

const CONFIG_FILE_NAME: &str = "config.toml";
const STORAGE_FILE_NAME: &str = "storage.json";
const APP_NAME: &str = "wadesk";

/// Default debounce window for coalesced layout writes (ms)
const DEFAULT_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    /// Backing file for the key/value store
    pub storage_path: PathBuf,
    /// Trailing-edge delay for coalesced layout snapshot writes
    pub debounce_ms: u64,
    pub sections: Vec<SectionDef>,
    pub ui: UiConfig,
    pub keys: Keys,
}

// =============================================================================
// UI Configuration
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct UiConfig {
    pub colors: UiColors,
}

#[derive(Debug, Clone)]
pub struct UiColors {
    pub border: RgbColor,
    pub selection_bg: RgbColor,
    pub selection_fg: RgbColor,
    pub status_fg: RgbColor,
    pub status_bg: RgbColor,
    pub accent: RgbColor,
}

impl Default for UiColors {
    fn default() -> Self {
        Self {
            border: RgbColor::new(90, 90, 90),
            selection_bg: RgbColor::new(38, 79, 120),
            selection_fg: RgbColor::new(255, 255, 255),
            status_fg: RgbColor::new(20, 20, 20),
            status_bg: RgbColor::new(130, 170, 255),
            accent: RgbColor::new(130, 170, 255),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl<'de> serde::Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Array([u8; 3]),
            Map { r: u8, g: u8, b: u8 },
        }

        let helper = Helper::deserialize(deserializer)?;
        let (r, g, b) = match helper {
            Helper::Array(values) => (values[0], values[1], values[2]),
            Helper::Map { r, g, b } => (r, g, b),
        };
        Ok(RgbColor { r, g, b })
    }
}

// =============================================================================
// Key Bindings - Context-aware with multiple bindings per action
// =============================================================================

/// All key bindings organized by context
#[derive(Debug, Clone, Default)]
pub struct Keys {
    /// Global keys (work in most contexts)
    pub global: GlobalKeys,
    /// Keys for the contacts table
    pub contacts: ContactsKeys,
    /// Keys for the contact-info section list
    pub sections: SectionKeys,
    /// Keys for the message composer
    pub composer: ComposerKeys,
    /// Keys for modal dialogs
    pub modal: ModalKeys,
}

#[derive(Debug, Clone)]
pub struct GlobalKeys {
    pub quit: Vec<String>,
    pub help: Vec<String>,
    pub next_panel: Vec<String>,
    pub prev_panel: Vec<String>,
    pub contact_info: Vec<String>,
    pub notifications: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ContactsKeys {
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SectionKeys {
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub toggle: Vec<String>,
    pub grab: Vec<String>,
    pub drop: Vec<String>,
    pub cancel: Vec<String>,
    pub tab_next: Vec<String>,
    pub tab_prev: Vec<String>,
    pub reset: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ComposerKeys {
    pub send: Vec<String>,
    pub emoji: Vec<String>,
    pub template: Vec<String>,
    pub attach: Vec<String>,
    pub assistant: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ModalKeys {
    pub cancel: Vec<String>,
    pub confirm: Vec<String>,
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub delete: Vec<String>,
    pub add: Vec<String>,
}

// =============================================================================
// Default implementations
// =============================================================================

impl Default for GlobalKeys {
    fn default() -> Self {
        Self {
            quit: vec!["q".into()],
            help: vec!["F1".into(), "?".into()],
            next_panel: vec!["Tab".into()],
            prev_panel: vec!["Backtab".into()],
            contact_info: vec!["i".into()],
            notifications: vec!["n".into()],
        }
    }
}

impl Default for ContactsKeys {
    fn default() -> Self {
        Self {
            next: vec!["j".into(), "Down".into()],
            prev: vec!["k".into(), "Up".into()],
            tags: vec!["t".into()],
        }
    }
}

impl Default for SectionKeys {
    fn default() -> Self {
        Self {
            next: vec!["j".into(), "Down".into()],
            prev: vec!["k".into(), "Up".into()],
            toggle: vec!["Space".into()],
            grab: vec!["g".into()],
            drop: vec!["Enter".into()],
            cancel: vec!["Escape".into()],
            tab_next: vec!["l".into(), "Right".into()],
            tab_prev: vec!["h".into(), "Left".into()],
            reset: vec!["R".into()],
        }
    }
}

impl Default for ComposerKeys {
    fn default() -> Self {
        Self {
            send: vec!["Enter".into()],
            emoji: vec!["F2".into()],
            template: vec!["F3".into()],
            attach: vec!["F4".into()],
            assistant: vec!["F5".into()],
        }
    }
}

impl Default for ModalKeys {
    fn default() -> Self {
        Self {
            cancel: vec!["Escape".into(), "q".into()],
            confirm: vec!["Enter".into(), "y".into()],
            next: vec!["j".into(), "Down".into(), "Tab".into()],
            prev: vec!["k".into(), "Up".into(), "Backtab".into()],
            delete: vec!["x".into()],
            add: vec!["a".into()],
        }
    }
}

/// Default section container: the four conversation sections of the Info tab,
/// in markup order.
pub fn default_sections() -> Vec<SectionDef> {
    vec![
        SectionDef::new("conversation-actions", "Conversation actions"),
        SectionDef::new("conversation-info", "Conversation info"),
        SectionDef::new("conversation-variables", "Conversation variables"),
        SectionDef::new("previous-conversations", "Previous conversations"),
    ]
}

// =============================================================================
// Serde deserialization types (support both single string and array)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KeyBinding {
    Single(String),
    Multiple(Vec<String>),
}

impl KeyBinding {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeyBinding::Single(s) => vec![s],
            KeyBinding::Multiple(v) => v,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    storage: Option<PathBuf>,
    debounce_ms: Option<u64>,
    sections: Option<Vec<SectionDefFile>>,
    ui: UiFile,
    keys: KeysFile,
}

#[derive(Debug, Deserialize)]
struct SectionDefFile {
    id: Option<String>,
    title: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct UiFile {
    colors: ColorsFile,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ColorsFile {
    border: Option<RgbColor>,
    selection_bg: Option<RgbColor>,
    selection_fg: Option<RgbColor>,
    status_fg: Option<RgbColor>,
    status_bg: Option<RgbColor>,
    accent: Option<RgbColor>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct KeysFile {
    global: GlobalKeysFile,
    contacts: ContactsKeysFile,
    sections: SectionKeysFile,
    composer: ComposerKeysFile,
    modal: ModalKeysFile,
}

macro_rules! keys_file {
    ($file:ident, $runtime:ident, { $($field:ident),+ $(,)? }) => {
        #[derive(Debug, Deserialize)]
        #[serde(default)]
        struct $file {
            $($field: KeyBinding,)+
        }

        impl Default for $file {
            fn default() -> Self {
                let defaults = $runtime::default();
                Self {
                    $($field: KeyBinding::Multiple(defaults.$field),)+
                }
            }
        }

        impl From<$file> for $runtime {
            fn from(file: $file) -> Self {
                Self {
                    $($field: file.$field.into_vec(),)+
                }
            }
        }
    };
}

keys_file!(GlobalKeysFile, GlobalKeys, {
    quit,
    help,
    next_panel,
    prev_panel,
    contact_info,
    notifications,
});
keys_file!(ContactsKeysFile, ContactsKeys, { next, prev, tags });
keys_file!(SectionKeysFile, SectionKeys, {
    next,
    prev,
    toggle,
    grab,
    drop,
    cancel,
    tab_next,
    tab_prev,
    reset,
});
keys_file!(ComposerKeysFile, ComposerKeys, {
    send,
    emoji,
    template,
    attach,
    assistant,
});
keys_file!(ModalKeysFile, ModalKeys, {
    cancel,
    confirm,
    next,
    prev,
    delete,
    add,
});

impl From<KeysFile> for Keys {
    fn from(file: KeysFile) -> Self {
        Self {
            global: file.global.into(),
            contacts: file.contacts.into(),
            sections: file.sections.into(),
            composer: file.composer.into(),
            modal: file.modal.into(),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Expand ~ to home directory in paths
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

fn default_config_path() -> Result<PathBuf> {
    let base = BaseDirs::new().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(base.config_dir().join(APP_NAME).join(CONFIG_FILE_NAME))
}

fn default_storage_path() -> Result<PathBuf> {
    let base = BaseDirs::new().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    Ok(base.data_dir().join(APP_NAME).join(STORAGE_FILE_NAME))
}

/// Load configuration from `override_path` or the platform config dir.
/// A missing file yields the built-in defaults; a present but invalid file
/// is an error.
pub fn load(override_path: Option<&Path>) -> Result<Config> {
    let path = match override_path {
        Some(path) => expand_tilde(path),
        None => default_config_path()?,
    };

    let file = if path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read configuration file at {}", path.display()))?;
        toml::from_str::<ConfigFile>(&raw)
            .with_context(|| format!("failed to parse {} as TOML", path.display()))?
    } else {
        ConfigFile::default()
    };

    build(path, file)
}

fn build(config_path: PathBuf, file: ConfigFile) -> Result<Config> {
    let storage_path = match file.storage {
        Some(path) => expand_tilde(&path),
        None => default_storage_path()?,
    };

    let sections = match file.sections {
        Some(defs) if !defs.is_empty() => defs
            .into_iter()
            .map(|def| SectionDef {
                id: def.id,
                title: def.title,
            })
            .collect(),
        _ => default_sections(),
    };

    let colors = {
        let defaults = UiColors::default();
        let file = file.ui.colors;
        UiColors {
            border: file.border.unwrap_or(defaults.border),
            selection_bg: file.selection_bg.unwrap_or(defaults.selection_bg),
            selection_fg: file.selection_fg.unwrap_or(defaults.selection_fg),
            status_fg: file.status_fg.unwrap_or(defaults.status_fg),
            status_bg: file.status_bg.unwrap_or(defaults.status_bg),
            accent: file.accent.unwrap_or(defaults.accent),
        }
    };

    Ok(Config {
        config_path,
        storage_path,
        debounce_ms: file.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
        sections,
        ui: UiConfig { colors },
        keys: file.keys.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Config {
        let file: ConfigFile = toml::from_str(raw).unwrap();
        build(PathBuf::from("test-config.toml"), file).unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse("");
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(config.sections.len(), 4);
        assert_eq!(
            config.sections[0].id.as_deref(),
            Some("conversation-actions")
        );
        assert_eq!(config.keys.global.quit, vec!["q"]);
    }

    #[test]
    fn storage_path_and_debounce_are_configurable() {
        let config = parse(
            r#"
storage = "/tmp/wadesk-test/storage.json"
debounce_ms = 400
"#,
        );
        assert_eq!(
            config.storage_path,
            PathBuf::from("/tmp/wadesk-test/storage.json")
        );
        assert_eq!(config.debounce_ms, 400);
    }

    #[test]
    fn sections_override_replaces_defaults() {
        let config = parse(
            r#"
[[sections]]
id = "custom-notes"
title = "Notes"

[[sections]]
title = "Untracked"
"#,
        );
        assert_eq!(config.sections.len(), 2);
        assert_eq!(config.sections[0].id.as_deref(), Some("custom-notes"));
        assert!(config.sections[1].id.is_none());
    }

    #[test]
    fn key_binding_accepts_single_string_and_array() {
        let config = parse(
            r#"
[keys.global]
quit = "x"

[keys.sections]
grab = ["g", "m"]
"#,
        );
        assert_eq!(config.keys.global.quit, vec!["x"]);
        assert_eq!(config.keys.sections.grab, vec!["g", "m"]);
        // Untouched groups keep their defaults
        assert_eq!(config.keys.sections.drop, vec!["Enter"]);
    }

    #[test]
    fn colors_accept_rgb_arrays_and_maps() {
        let config = parse(
            r#"
[ui.colors]
border = [1, 2, 3]
accent = { r = 4, g = 5, b = 6 }
"#,
        );
        assert_eq!(config.ui.colors.border.r, 1);
        assert_eq!(config.ui.colors.accent.b, 6);
    }
}
