//! Language code resolution for machine translation.
//!
//! Locale ids taken from `.tr` file names (`fr`, `pt_BR`, `zh_CN`, ...) are
//! checked with `unic-langid` and mapped onto the codes translation services
//! accept.

use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// Language codes accepted by common machine-translation services.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "am", "ar", "az", "be", "bg", "bn", "bs", "ca", "ceb", "co", "cs", "cy", "da", "de",
    "el", "en", "eo", "es", "et", "eu", "fa", "fi", "fr", "fy", "ga", "gd", "gl", "gu", "ha",
    "haw", "he", "hi", "hmn", "hr", "ht", "hu", "hy", "id", "ig", "is", "it", "iw", "ja", "jw",
    "ka", "kk", "km", "kn", "ko", "ku", "ky", "la", "lb", "lo", "lt", "lv", "mg", "mi", "mk",
    "ml", "mn", "mr", "ms", "mt", "my", "ne", "nl", "no", "ny", "pa", "pl", "ps", "pt", "ro",
    "ru", "sd", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr", "st", "su", "sv", "sw", "ta",
    "te", "tg", "th", "tl", "tr", "ug", "uk", "ur", "uz", "vi", "xh", "yi", "yo", "zh-cn",
    "zh-tw", "zu",
];

/// Lowercases and uses `-` as the subtag separator (`pt_BR` -> `pt-br`).
pub fn normalize_lang(lang: &str) -> String {
    lang.trim().replace('_', "-").to_ascii_lowercase()
}

fn lang_base(lang: &str) -> &str {
    lang.split('-').next().unwrap_or(lang)
}

/// Returns true if `code` (already normalized) is in [`SUPPORTED_LANGUAGES`].
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Validates a locale id and returns the service code to use for it.
///
/// The full tag is tried first (`zh_CN` -> `zh-cn`), then its base language
/// (`pt_BR` -> `pt`). `supports` decides which codes are acceptable.
pub fn resolve_language<F>(locale: &str, supports: F) -> Result<String, Error>
where
    F: Fn(&str) -> bool,
{
    let normalized = normalize_lang(locale);
    if normalized.is_empty() || normalized.parse::<LanguageIdentifier>().is_err() {
        return Err(Error::InvalidLanguage(locale.to_string()));
    }

    if supports(&normalized) {
        return Ok(normalized);
    }
    let base = lang_base(&normalized);
    if supports(base) {
        return Ok(base.to_string());
    }
    Err(Error::UnsupportedLanguage(locale.to_string()))
}
