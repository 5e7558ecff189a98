//! Internationalization (i18n) module.
//!
//! Translations are embedded with `include_str!` and parsed once on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::warn;

/// Fallback language for missing keys.
pub const FALLBACK_LANG: &str = "en";

/// Global translation store: LangCode -> Key -> Text
static TRANSLATIONS: Lazy<HashMap<&'static str, Value>> = Lazy::new(|| {
    let mut map = HashMap::new();

    for (lang, raw) in [("en", include_str!("en.json")), ("uz", include_str!("uz.json"))] {
        match serde_json::from_str(raw) {
            Ok(val) => {
                map.insert(lang, val);
            }
            Err(e) => warn!("Failed to parse {} translations: {}", lang, e),
        }
    }

    map
});

/// Whether a language has a translation table.
pub fn is_supported(lang: &str) -> bool {
    TRANSLATIONS.contains_key(lang)
}

/// Get text for a key in a specific language.
/// Supports nested keys via dot notation, e.g., "moderation.warned".
pub fn get_text(lang: &str, key: &str) -> String {
    if let Some(text) = TRANSLATIONS.get(lang).and_then(|val| resolve_key(val, key)) {
        return text;
    }

    if lang != FALLBACK_LANG
        && let Some(text) = TRANSLATIONS.get(FALLBACK_LANG).and_then(|val| resolve_key(val, key))
    {
        return text;
    }

    // Key not found
    key.to_string()
}

/// Get text and substitute `{name}` placeholders.
pub fn get_text_with(lang: &str, key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(get_text(lang, key), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}

fn resolve_key(val: &Value, key: &str) -> Option<String> {
    let mut current = val;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    current.as_str().map(|s| s.to_string())
}
