use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::messages::MessageBundle;
use crate::task::{Task, TaskRecord, TaskSet};

// Every key is namespaced so a shared backing store stays collision-free.
const KEY_PREFIX: &str = "daylist.";

const KEY_LOCALE_LANG: &str = "daylist.locale.lang";
const KEY_LOCALE_COUNTRY: &str = "daylist.locale.country";
const KEY_ON_TOP: &str = "daylist.ontop";
const KEY_THEME: &str = "daylist.theme";
const KEY_TASKS: &str = "daylist.tasks";

const DEFAULT_ON_TOP: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Gray,
    Dark,
    Black,
    Blue,
    Cyan,
    Green,
    Yellow,
    Orange,
    Red,
    Pink,
    Magenta,
}

impl Theme {
    pub const DEFAULT: Theme = Theme::Orange;

    pub const ALL: [Theme; 12] = [
        Theme::Light,
        Theme::Gray,
        Theme::Dark,
        Theme::Black,
        Theme::Blue,
        Theme::Cyan,
        Theme::Green,
        Theme::Yellow,
        Theme::Orange,
        Theme::Red,
        Theme::Pink,
        Theme::Magenta,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "LIGHT",
            Theme::Gray => "GRAY",
            Theme::Dark => "DARK",
            Theme::Black => "BLACK",
            Theme::Blue => "BLUE",
            Theme::Cyan => "CYAN",
            Theme::Green => "GREEN",
            Theme::Yellow => "YELLOW",
            Theme::Orange => "ORANGE",
            Theme::Red => "RED",
            Theme::Pink => "PINK",
            Theme::Magenta => "MAGENTA",
        }
    }

    pub fn from_name(name: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn background(self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Gray => "#c0c0c0",
            Theme::Dark => "#404040",
            Theme::Black => "#000000",
            Theme::Blue => "#0000ff",
            Theme::Cyan => "#00ffff",
            Theme::Green => "#00ff00",
            Theme::Yellow => "#ffff00",
            Theme::Orange => "#ffc800",
            Theme::Red => "#ff0000",
            Theme::Pink => "#ffafaf",
            Theme::Magenta => "#ff00ff",
        }
    }

    pub fn foreground(self) -> &'static str {
        match self {
            Theme::Light => "#404040",
            Theme::Gray | Theme::Cyan | Theme::Green | Theme::Yellow => "#000000",
            Theme::Dark => "#c0c0c0",
            Theme::Black => "#808080",
            Theme::Blue | Theme::Red | Theme::Magenta => "#ffffff",
            Theme::Orange | Theme::Pink => "#000000",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Theme::Blue | Theme::Cyan => "checkicon-blue",
            Theme::Red => "checkicon-red",
            Theme::Pink | Theme::Magenta => "checkicon-magenta",
            _ => "checkicon",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub language: String,
    pub country: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            country: None,
        }
    }

    pub fn with_country(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            country: Some(country.into()),
        }
    }

    pub fn platform_default() -> Self {
        let raw = std::env::var("LC_ALL")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_default();
        let tag = raw.split('.').next().unwrap_or("");
        match tag.split_once('_') {
            Some((lang, country)) if !lang.is_empty() && !country.is_empty() => {
                Self::with_country(lang, country)
            }
            _ if !tag.is_empty() => Self::new(tag),
            _ => Self::new("en"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => write!(f, "{}", self.language),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiPreferences {
    pub locale: Locale,
    pub theme: Theme,
    pub always_on_top: bool,
}

/// Non-fatal fallback events, queued for one-time display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefWarning {
    InvalidTheme { stored: String },
    InvalidOnTop { stored: String },
    EmptyTaskSet,
}

impl fmt::Display for PrefWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefWarning::InvalidTheme { stored } => {
                write!(f, "stored theme {stored:?} is unknown; using the default theme")
            }
            PrefWarning::InvalidOnTop { stored } => {
                write!(f, "stored on-top flag {stored:?} is not a boolean; using the default")
            }
            PrefWarning::EmptyTaskSet => {
                write!(f, "stored task list was empty; starting with the default task")
            }
        }
    }
}

/// Key/value preferences file, `key=value` lines rewritten atomically on
/// every mutation. Invalid stored values are removed on read and replaced
/// with defaults.
#[derive(Debug)]
pub struct PrefsStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    warnings: Vec<PrefWarning>,
}

impl PrefsStore {
    /// A missing file is an empty store.
    #[tracing::instrument(skip(path))]
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| CoreError::StoreIo {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let mut entries = BTreeMap::new();
        if path.exists() {
            let text = fs::read_to_string(path).map_err(|source| CoreError::StoreIo {
                path: path.to_path_buf(),
                source,
            })?;
            for (line_num, raw_line) in text.lines().enumerate() {
                let line = raw_line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let (k, v) = line.split_once('=').ok_or_else(|| CoreError::MalformedEntry {
                    path: path.to_path_buf(),
                    line: line_num + 1,
                    text: raw_line.to_string(),
                })?;
                entries.insert(k.trim().to_string(), v.to_string());
            }
        }

        info!(
            path = %path.display(),
            entries = entries.len(),
            "opened preferences store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            warnings: vec![],
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The first read seeds the store with the platform default locale.
    #[tracing::instrument(skip(self))]
    pub fn get_locale(&mut self) -> Result<Locale, CoreError> {
        match self.entries.get(KEY_LOCALE_LANG) {
            Some(lang) => {
                let language = lang.clone();
                let country = self.entries.get(KEY_LOCALE_COUNTRY).cloned();
                Ok(Locale { language, country })
            }
            None => {
                let locale = Locale::platform_default();
                info!(locale = %locale, "no stored locale; seeding platform default");
                self.entries
                    .insert(KEY_LOCALE_LANG.to_string(), locale.language.clone());
                if let Some(country) = &locale.country {
                    self.entries
                        .insert(KEY_LOCALE_COUNTRY.to_string(), country.clone());
                }
                self.save()?;
                Ok(locale)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn set_locale(&mut self, language: &str, country: Option<&str>) -> Result<(), CoreError> {
        self.entries
            .insert(KEY_LOCALE_LANG.to_string(), language.to_string());
        match country {
            Some(country) => {
                self.entries
                    .insert(KEY_LOCALE_COUNTRY.to_string(), country.to_string());
            }
            None => {
                self.entries.remove(KEY_LOCALE_COUNTRY);
            }
        }
        self.save()
    }

    #[tracing::instrument(skip(self))]
    pub fn get_theme(&mut self) -> Result<Theme, CoreError> {
        match self.entries.get(KEY_THEME) {
            None => Ok(Theme::DEFAULT),
            Some(name) => match Theme::from_name(name) {
                Some(theme) => Ok(theme),
                None => {
                    warn!(stored = %name, "unknown stored theme; removing and using default");
                    self.warnings
                        .push(PrefWarning::InvalidTheme { stored: name.clone() });
                    self.entries.remove(KEY_THEME);
                    self.save()?;
                    Ok(Theme::DEFAULT)
                }
            },
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), CoreError> {
        self.entries
            .insert(KEY_THEME.to_string(), theme.name().to_string());
        self.save()
    }

    #[tracing::instrument(skip(self))]
    pub fn is_always_on_top(&mut self) -> Result<bool, CoreError> {
        match self.entries.get(KEY_ON_TOP).map(String::as_str) {
            None => Ok(DEFAULT_ON_TOP),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => {
                warn!(stored = %other, "stored on-top flag is not a boolean; removing and using default");
                self.warnings.push(PrefWarning::InvalidOnTop {
                    stored: other.to_string(),
                });
                self.entries.remove(KEY_ON_TOP);
                self.save()?;
                Ok(DEFAULT_ON_TOP)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn set_always_on_top(&mut self, on_top: bool) -> Result<(), CoreError> {
        self.entries
            .insert(KEY_ON_TOP.to_string(), on_top.to_string());
        self.save()
    }

    /// An absent or blank blob falls back to the default set. A blob that
    /// is present but does not decode is an error; it was written by this
    /// same store, so it never silently defaults.
    #[tracing::instrument(skip(self, bundle))]
    pub fn get_tasks(&mut self, bundle: &MessageBundle) -> Result<TaskSet, CoreError> {
        let Some(blob) = self.entries.get(KEY_TASKS) else {
            debug!("no stored tasks; using default set");
            return Ok(default_task_set(bundle));
        };

        if blob.trim().is_empty() {
            debug!("stored task blob is blank; using default set");
            self.warnings.push(PrefWarning::EmptyTaskSet);
            return Ok(default_task_set(bundle));
        }

        let records: Vec<TaskRecord> =
            serde_json::from_str(blob).map_err(|source| CoreError::CorruptTaskBlob {
                path: self.path.clone(),
                source,
            })?;

        if records.is_empty() {
            debug!("stored task set is empty; using default set");
            self.warnings.push(PrefWarning::EmptyTaskSet);
            return Ok(default_task_set(bundle));
        }

        debug!(count = records.len(), "loaded stored tasks");
        Ok(TaskSet::from_records(records))
    }

    /// Replaces the stored blob wholesale.
    #[tracing::instrument(skip(self, tasks), fields(count = tasks.len()))]
    pub fn set_tasks(&mut self, tasks: &TaskSet) -> Result<(), CoreError> {
        let blob = serde_json::to_string(&tasks.to_records()).map_err(|source| {
            CoreError::CorruptTaskBlob {
                path: self.path.clone(),
                source,
            }
        })?;
        self.entries.insert(KEY_TASKS.to_string(), blob);
        self.save()
    }

    pub fn ui_preferences(&mut self) -> Result<UiPreferences, CoreError> {
        Ok(UiPreferences {
            locale: self.get_locale()?,
            theme: self.get_theme()?,
            always_on_top: self.is_always_on_top()?,
        })
    }

    pub fn set_ui_preferences(&mut self, prefs: &UiPreferences) -> Result<(), CoreError> {
        self.set_locale(&prefs.locale.language, prefs.locale.country.as_deref())?;
        self.set_theme(prefs.theme)?;
        self.set_always_on_top(prefs.always_on_top)
    }

    /// Drops every namespaced key.
    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.entries.retain(|key, _| !key.starts_with(KEY_PREFIX));
        self.save()
    }

    pub fn take_warnings(&mut self) -> Vec<PrefWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn save(&self) -> Result<(), CoreError> {
        save_atomic(&self.path, &self.entries)
    }
}

pub fn default_task_set(bundle: &MessageBundle) -> TaskSet {
    let mut set = TaskSet::new();
    set.add(Task::new(bundle.get("task.default")));
    set
}

fn save_atomic(path: &Path, entries: &BTreeMap<String, String>) -> Result<(), CoreError> {
    debug!(file = %path.display(), count = entries.len(), "saving preferences atomically");

    let io_err = |source: std::io::Error| CoreError::StoreIo {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
    for (key, value) in entries {
        writeln!(temp, "{key}={value}").map_err(io_err)?;
    }
    temp.flush().map_err(io_err)?;

    temp.persist(path).map_err(|err| CoreError::StoreIo {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    Ok(())
}
