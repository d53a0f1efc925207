use crate::dom::Document;
use crate::poller::ExplanationService;

pub const SUPPORTED_LANGUAGES: [&str; 20] = [
    "en", "es", "de", "fr", "ru", "zh", "ar", "pt", "it", "nl", "sr", "pl", "el", "tr", "ja", "hi",
    "fa", "id", "sw", "ha",
];

pub const DEFAULT_LANGUAGE: &str = "en";

pub const FALLBACK_TEXT: &str = "Explanation not available.";

/// The language tags the environment reports, most preferred first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LanguagePreference {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl LanguagePreference {
    pub fn from_system() -> Self {
        let mut locales = sys_locale::get_locales();
        Self {
            primary: locales.next(),
            secondary: locales.next(),
        }
    }

    pub fn pinned(tag: impl Into<String>) -> Self {
        Self {
            primary: Some(tag.into()),
            secondary: None,
        }
    }
}

/// Two-letter code from the allow-list, `"en"` when nothing usable is reported.
pub fn resolve_language(preference: &LanguagePreference) -> &'static str {
    let raw = [&preference.primary, &preference.secondary]
        .into_iter()
        .flatten()
        .find(|tag| !tag.is_empty())
        .map(String::as_str)
        .unwrap_or(DEFAULT_LANGUAGE);

    let short: String = raw.chars().take(2).collect::<String>().to_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|code| **code == short)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Fetches the text for `lang` and places it in `element_id` as plain text.
///
/// Any failure shows [`FALLBACK_TEXT`]. A missing element is a no-op.
pub fn load_explanation(
    service: &dyn ExplanationService,
    document: &mut dyn Document,
    element_id: &str,
    lang: &str,
) {
    let text = match service.fetch_explanation(lang) {
        Ok(payload) => payload.text(),
        Err(e) => {
            log::debug!("Explanation fetch for '{lang}' failed: {e}");
            FALLBACK_TEXT.to_string()
        }
    };

    match document.element_mut(element_id) {
        Some(element) => element.set_text_content(text),
        None => log::debug!("No '{element_id}' element to show the explanation in"),
    }
}
