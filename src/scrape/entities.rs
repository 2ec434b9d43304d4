use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#?[A-Za-z0-9_]+;").expect("entity regex is valid"));

/// Decimal references the upstream emits for Turkish letters.
const TURKISH_ENTITIES: &[(&str, &str)] = &[
    ("&#199;", "Ç"),
    ("&#231;", "ç"),
    ("&#286;", "Ğ"),
    ("&#287;", "ğ"),
    ("&#304;", "İ"),
    ("&#305;", "ı"),
    ("&#214;", "Ö"),
    ("&#246;", "ö"),
    ("&#350;", "Ş"),
    ("&#351;", "ş"),
    ("&#220;", "Ü"),
    ("&#252;", "ü"),
];

/// Replace known Turkish character references; anything else is left as is.
pub fn decode_html_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            TURKISH_ENTITIES
                .iter()
                .find(|(entity, _)| *entity == token)
                .map(|(_, ch)| (*ch).to_string())
                .unwrap_or_else(|| token.to_string())
        })
        .into_owned()
}
