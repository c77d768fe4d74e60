use tracing::debug;

use crate::prefs::{Locale, Theme};

const DEFAULT_LANG: &str = "en";

const EN: &[(&str, &str)] = &[
    ("app.title", "Daily tasks"),
    ("task.default", "Add more tasks"),
    ("confirm.skip.unfinished.title", "Unfinished tasks"),
    (
        "confirm.skip.unfinished.body",
        "Some tasks are not done yet. Close anyway?",
    ),
    ("theme.LIGHT", "Light"),
    ("theme.GRAY", "Gray"),
    ("theme.DARK", "Dark"),
    ("theme.BLACK", "Black"),
    ("theme.BLUE", "Blue"),
    ("theme.CYAN", "Cyan"),
    ("theme.GREEN", "Green"),
    ("theme.YELLOW", "Yellow"),
    ("theme.ORANGE", "Orange"),
    ("theme.RED", "Red"),
    ("theme.PINK", "Pink"),
    ("theme.MAGENTA", "Magenta"),
];

const FR: &[(&str, &str)] = &[
    ("app.title", "Tâches quotidiennes"),
    ("task.default", "Ajoutez d'autres tâches"),
    ("confirm.skip.unfinished.title", "Tâches inachevées"),
    (
        "confirm.skip.unfinished.body",
        "Certaines tâches ne sont pas terminées. Fermer quand même ?",
    ),
    ("theme.LIGHT", "Clair"),
    ("theme.GRAY", "Gris"),
    ("theme.DARK", "Sombre"),
    ("theme.BLACK", "Noir"),
    ("theme.BLUE", "Bleu"),
    ("theme.CYAN", "Cyan"),
    ("theme.GREEN", "Vert"),
    ("theme.YELLOW", "Jaune"),
    ("theme.ORANGE", "Orange"),
    ("theme.RED", "Rouge"),
    ("theme.PINK", "Rose"),
    ("theme.MAGENTA", "Magenta"),
];

fn table_for(lang: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match lang {
        "en" => Some(EN),
        "fr" => Some(FR),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct MessageBundle {
    table: &'static [(&'static str, &'static str)],
}

impl MessageBundle {
    pub fn new(locale: &Locale) -> Self {
        let resolved = closest_applicable_locale(locale);
        debug!(requested = %locale, resolved = %resolved, "resolved message bundle");
        let table = table_for(&resolved.language).unwrap_or(EN);
        Self { table }
    }

    /// Falls back to the default language, then to the key itself.
    pub fn get<'a>(&self, key: &'a str) -> &'a str {
        lookup(self.table, key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
    }

    pub fn theme_name(&self, theme: Theme) -> String {
        let key = format!("theme.{}", theme.name());
        self.get(&key).to_string()
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn available_locales() -> Vec<Locale> {
    vec![Locale::new("en"), Locale::new("fr")]
}

pub fn closest_applicable_locale(locale: &Locale) -> Locale {
    if table_for(&locale.language).is_some() {
        Locale::new(locale.language.clone())
    } else {
        Locale::new(DEFAULT_LANG)
    }
}
