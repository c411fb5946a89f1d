use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::present::ColorFamily;

/// Literal colors for each color family. The preview and the source view
/// each carry one set; both pick the slot through the same family.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ColorSet {
    pub email: String,
    pub phone: String,
    pub url: String,
    pub markup: String,
}

impl ColorSet {
    pub fn preview() -> Self {
        Self {
            email: "#d93025".into(),
            phone: "#188038".into(),
            url: "#1a73e8".into(),
            markup: "gray".into(),
        }
    }

    pub fn source() -> Self {
        Self {
            email: "red".into(),
            phone: "green".into(),
            url: "blue".into(),
            markup: "gray".into(),
        }
    }

    pub fn color(&self, family: ColorFamily) -> &str {
        match family {
            ColorFamily::Red => &self.email,
            ColorFamily::Green => &self.phone,
            ColorFamily::Blue => &self.url,
            ColorFamily::Gray => &self.markup,
        }
    }

    fn validate(&self, set: &str) -> Result<(), ConfigError> {
        for (slot, value) in [
            ("email", &self.email),
            ("phone", &self.phone),
            ("url", &self.url),
            ("markup", &self.markup),
        ] {
            if !is_css_color(value) {
                return Err(ConfigError::InvalidColor {
                    slot: format!("{set}.{slot}"),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    fn overlay(mut self, overrides: ColorOverrides) -> Self {
        if let Some(email) = overrides.email {
            self.email = email;
        }
        if let Some(phone) = overrides.phone {
            self.phone = phone;
        }
        if let Some(url) = overrides.url {
            self.url = url;
        }
        if let Some(markup) = overrides.markup {
            self.markup = markup;
        }
        self
    }
}

// Partial tables only replace the slots they name, on top of the defaults of
// the set they belong to.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ColorOverrides {
    email: Option<String>,
    phone: Option<String>,
    url: Option<String>,
    markup: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaletteOverrides {
    preview: ColorOverrides,
    source: ColorOverrides,
}

impl From<PaletteOverrides> for PaletteConfig {
    fn from(overrides: PaletteOverrides) -> Self {
        Self {
            preview: ColorSet::preview().overlay(overrides.preview),
            source: ColorSet::source().overlay(overrides.source),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "PaletteOverrides")]
pub struct PaletteConfig {
    pub preview: ColorSet,
    pub source: ColorSet,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            preview: ColorSet::preview(),
            source: ColorSet::source(),
        }
    }
}

impl PaletteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.preview.validate("preview")?;
        self.source.validate("source")
    }
}

// Colors end up inside a style attribute, so only hex codes and plain names.
fn is_css_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6) && hex.chars().all(|ch| ch.is_ascii_hexdigit());
    }
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(PaletteConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_source_table_keeps_source_defaults() {
        let palette: PaletteConfig = toml::from_str("[source]\nurl = \"navy\"\n").expect("toml");
        assert_eq!(palette.source.url, "navy");
        assert_eq!(palette.source.email, "red");
        assert_eq!(palette.preview, ColorSet::preview());
    }

    #[test]
    fn accepts_hex_and_names_only() {
        assert!(is_css_color("#abc"));
        assert!(is_css_color("#1A73E8"));
        assert!(is_css_color("rebeccapurple"));
        assert!(!is_css_color("#12345"));
        assert!(!is_css_color("red;x"));
        assert!(!is_css_color(""));
    }
}
