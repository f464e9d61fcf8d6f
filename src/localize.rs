/// Localisation surface supplied by the host application. The engine only
/// hands over keys and parameters.
pub trait Translator {
    fn translate(&self, key: &str, params: &[(&str, String)]) -> String;

    /// Swap ASCII digits for the locale's digits.
    fn to_locale_digits(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Returns keys untouched, with parameters rendered as `key(name=value)`.
/// Useful wherever the caller resolves strings later.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyTranslator;

impl Translator for KeyTranslator {
    fn translate(&self, key: &str, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return key.to_string();
        }
        let rendered = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(",");
        format!("{key}({rendered})")
    }
}
