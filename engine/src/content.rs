use indexmap::IndexMap;

use crate::timings::{ConfigError, Timings};

pub fn builtin_presets() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        ("classic", include_str!("../content/presets/classic.json")),
        ("frantic", include_str!("../content/presets/frantic.json")),
    ])
}

/// Parse a built-in preset by name. `Ok(None)` when there is no such preset.
pub fn preset(name: &str) -> Result<Option<Timings>, ConfigError> {
    let presets = builtin_presets();
    let Some(text) = presets
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, text)| *text)
    else {
        return Ok(None);
    };
    Timings::from_json_str(text).map(Some)
}
