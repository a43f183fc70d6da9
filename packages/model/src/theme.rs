//! # Theme tokens
//!
//! A theme is an immutable set of design tokens. Changing the theme of a
//! site replaces the whole value; individual tokens are never patched in
//! place by the editor.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub colors: Colors,
    pub typography: Typography,
    pub spacing: Spacing,
    pub breakpoints: Breakpoints,
    pub border_radius: BorderRadius,
    pub shadows: Shadows,
    pub transitions: Transitions,
    pub z_index: ZIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: BackgroundColors,
    pub text: TextColors,
    pub border: String,
    pub error: String,
    pub success: String,
    pub warning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub inverse: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: FontFamily,
    pub font_size: FontSize,
    pub font_weight: FontWeight,
    pub line_height: LineHeight,
    pub letter_spacing: LetterSpacing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFamily {
    pub heading: String,
    pub body: String,
    pub mono: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSize {
    pub xs: String,
    pub sm: String,
    pub base: String,
    pub lg: String,
    pub xl: String,
    #[serde(rename = "2xl")]
    pub xxl: String,
    #[serde(rename = "3xl")]
    pub xxxl: String,
    #[serde(rename = "4xl")]
    pub xxxxl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontWeight {
    pub normal: String,
    pub medium: String,
    pub semibold: String,
    pub bold: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineHeight {
    pub none: String,
    pub tight: String,
    pub normal: String,
    pub relaxed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterSpacing {
    pub tight: String,
    pub normal: String,
    pub wide: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub unit: u32,
    pub scale: SpacingScale,
    pub container: Container,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingScale {
    pub xs: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub padding: String,
    pub max_width: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoints {
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
    #[serde(rename = "2xl")]
    pub xxl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderRadius {
    pub none: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub full: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadows {
    pub none: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transitions {
    pub fast: String,
    pub normal: String,
    pub slow: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZIndex {
    pub dropdown: u32,
    pub sticky: u32,
    pub fixed: u32,
    pub modal: u32,
    pub popover: u32,
}

impl Theme {
    /// Copy of this theme under a new name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Flatten the tokens into CSS custom properties.
    ///
    /// Keys are kebab-cased and joined by `-`: `colors.background.primary`
    /// becomes `--colors-background-primary`, `typography.fontSize.2xl`
    /// becomes `--typography-font-size-2xl`. The theme name is not a token.
    pub fn css_variables(&self) -> BTreeMap<String, String> {
        let mut variables = BTreeMap::new();

        if let Ok(Value::Object(groups)) = serde_json::to_value(self) {
            for (key, value) in groups.iter().filter(|(key, _)| key.as_str() != "name") {
                flatten_tokens(&format!("--{}", kebab_case(key)), value, &mut variables);
            }
        }

        variables
    }
}

fn flatten_tokens(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(entries) => {
            for (key, nested) in entries {
                flatten_tokens(&format!("{}-{}", prefix, kebab_case(key)), nested, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

impl Default for Theme {
    fn default() -> Self {
        let s = |value: &str| value.to_string();

        Self {
            name: s("Default"),
            colors: Colors {
                primary: s("#3B82F6"),
                secondary: s("#6B7280"),
                accent: s("#10B981"),
                background: BackgroundColors {
                    primary: s("#FFFFFF"),
                    secondary: s("#F3F4F6"),
                    accent: s("#F0FDF4"),
                },
                text: TextColors {
                    primary: s("#1F2937"),
                    secondary: s("#4B5563"),
                    accent: s("#059669"),
                    inverse: s("#FFFFFF"),
                },
                border: s("#E5E7EB"),
                error: s("#EF4444"),
                success: s("#10B981"),
                warning: s("#F59E0B"),
            },
            typography: Typography {
                font_family: FontFamily {
                    heading: s("Inter, system-ui, sans-serif"),
                    body: s("Inter, system-ui, sans-serif"),
                    mono: s("ui-monospace, SFMono-Regular, Menlo, monospace"),
                },
                font_size: FontSize {
                    xs: s("0.75rem"),
                    sm: s("0.875rem"),
                    base: s("1rem"),
                    lg: s("1.125rem"),
                    xl: s("1.25rem"),
                    xxl: s("1.5rem"),
                    xxxl: s("1.875rem"),
                    xxxxl: s("2.25rem"),
                },
                font_weight: FontWeight {
                    normal: s("400"),
                    medium: s("500"),
                    semibold: s("600"),
                    bold: s("700"),
                },
                line_height: LineHeight {
                    none: s("1"),
                    tight: s("1.25"),
                    normal: s("1.5"),
                    relaxed: s("1.75"),
                },
                letter_spacing: LetterSpacing {
                    tight: s("-0.025em"),
                    normal: s("0"),
                    wide: s("0.025em"),
                },
            },
            spacing: Spacing {
                unit: 4,
                scale: SpacingScale {
                    xs: s("0.5rem"),
                    sm: s("1rem"),
                    md: s("1.5rem"),
                    lg: s("2rem"),
                    xl: s("3rem"),
                },
                container: Container {
                    padding: s("1rem"),
                    max_width: s("1280px"),
                },
            },
            breakpoints: Breakpoints {
                sm: s("640px"),
                md: s("768px"),
                lg: s("1024px"),
                xl: s("1280px"),
                xxl: s("1536px"),
            },
            border_radius: BorderRadius {
                none: s("0"),
                sm: s("0.25rem"),
                md: s("0.375rem"),
                lg: s("0.5rem"),
                full: s("9999px"),
            },
            shadows: Shadows {
                none: s("none"),
                sm: s("0 1px 2px 0 rgb(0 0 0 / 0.05)"),
                md: s("0 4px 6px -1px rgb(0 0 0 / 0.1)"),
                lg: s("0 10px 15px -3px rgb(0 0 0 / 0.1)"),
                xl: s("0 20px 25px -5px rgb(0 0 0 / 0.1)"),
            },
            transitions: Transitions {
                fast: s("150ms"),
                normal: s("300ms"),
                slow: s("500ms"),
            },
            z_index: ZIndex {
                dropdown: 1000,
                sticky: 1020,
                fixed: 1030,
                modal: 1040,
                popover: 1050,
            },
        }
    }
}
