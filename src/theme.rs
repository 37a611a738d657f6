//! Page color theme.
//!
//! The theme is a fixed set of named slots holding CSS color strings. The
//! model can overwrite individual slots or restore the baseline; slot names
//! it invents are dropped before they reach the store.

use ratatui::style::Color;
use std::collections::BTreeMap;

/// A named theme attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThemeSlot {
    Background,
    Text,
    AboutBackground,
    AboutText,
}

impl ThemeSlot {
    pub fn all() -> [ThemeSlot; 4] {
        [
            ThemeSlot::Background,
            ThemeSlot::Text,
            ThemeSlot::AboutBackground,
            ThemeSlot::AboutText,
        ]
    }

    /// Name used by the model in `change_color` commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeSlot::Background => "background",
            ThemeSlot::Text => "text",
            ThemeSlot::AboutBackground => "aboutBackground",
            ThemeSlot::AboutText => "aboutText",
        }
    }

    /// Exact, case-sensitive lookup. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|slot| slot.as_str() == name)
    }

    pub fn css_variable(&self) -> &'static str {
        match self {
            ThemeSlot::Background => "--background-color",
            ThemeSlot::Text => "--text-color",
            ThemeSlot::AboutBackground => "--about-background-color",
            ThemeSlot::AboutText => "--about-text-color",
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            ThemeSlot::Background => "#f4f1ea",
            ThemeSlot::Text => "#4b3f35",
            ThemeSlot::AboutBackground => "rgba(255, 255, 255, 0.7)",
            ThemeSlot::AboutText => "#4b3f35",
        }
    }
}

/// Pending per-slot overwrites, keyed by slot so a later entry replaces an
/// earlier one.
pub type ThemeUpdate = BTreeMap<ThemeSlot, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    colors: BTreeMap<ThemeSlot, String>,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ThemeState {
    pub fn baseline() -> Self {
        let colors = ThemeSlot::all()
            .into_iter()
            .map(|slot| (slot, slot.default_color().to_string()))
            .collect();
        Self { colors }
    }

    pub fn get(&self, slot: ThemeSlot) -> &str {
        self.colors
            .get(&slot)
            .map(String::as_str)
            .unwrap_or_else(|| slot.default_color())
    }

    /// Merge `updates` into the current colors; slots not mentioned keep
    /// their value.
    pub fn apply_partial(&mut self, updates: &ThemeUpdate) {
        for (slot, color) in updates {
            self.colors.insert(*slot, color.clone());
        }
        tracing::debug!(style = %self.style_attribute(), "theme updated");
    }

    pub fn reset(&mut self) {
        *self = Self::baseline();
        tracing::debug!("theme reset to baseline");
    }

    pub fn is_baseline(&self) -> bool {
        *self == Self::baseline()
    }

    /// `(--variable, value)` pairs in slot order.
    pub fn css_variables(&self) -> Vec<(&'static str, &str)> {
        ThemeSlot::all()
            .into_iter()
            .map(|slot| (slot.css_variable(), self.get(slot)))
            .collect()
    }

    pub fn style_attribute(&self) -> String {
        self.css_variables()
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Resolve every slot to a drawable terminal color.
    pub fn palette(&self) -> Palette {
        let background = parse_color(self.get(ThemeSlot::Background)).unwrap_or(Rgba::WHITE);
        let resolve = |slot: ThemeSlot, under: Rgba| -> Color {
            match parse_color(self.get(slot)) {
                Some(rgba) => rgba.over(under).into(),
                None => {
                    tracing::debug!(slot = slot.as_str(), value = self.get(slot), "unparseable color");
                    Color::Reset
                }
            }
        };
        let about_background = resolve(ThemeSlot::AboutBackground, background);
        let about_under = parse_color(self.get(ThemeSlot::AboutBackground))
            .map(|c| c.over(background))
            .unwrap_or(background);

        Palette {
            background: resolve(ThemeSlot::Background, Rgba::WHITE),
            text: resolve(ThemeSlot::Text, background),
            about_background,
            about_text: resolve(ThemeSlot::AboutText, about_under),
        }
    }
}

/// Terminal colors resolved from a [`ThemeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub about_background: Color,
    pub about_text: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Alpha-composite `self` over an opaque `under`.
    pub fn over(self, under: Rgba) -> Rgba {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| -> u8 {
            (top as f32 * a + bottom as f32 * (1.0 - a)).round().clamp(0.0, 255.0) as u8
        };
        Rgba::opaque(mix(self.r, under.r), mix(self.g, under.g), mix(self.b, under.b))
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// Parse a CSS color: `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
/// or a common named color.
pub fn parse_color(raw: &str) -> Option<Rgba> {
    let value = raw.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
    {
        return parse_rgb_args(args.strip_suffix(')')?);
    }
    named_color(&value)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Rgba::opaque(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgba::opaque(r, g, b))
        }
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args
        .split([',', ' ', '/'])
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f32 = s.parse().ok()?;
        Some(v.clamp(0.0, 255.0).round() as u8)
    };
    let alpha = match parts.get(3) {
        Some(a) => match a.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? / 100.0,
            None => a.parse::<f32>().ok()?,
        },
        None => 1.0,
    };
    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a: alpha.clamp(0.0, 1.0),
    })
}

fn named_color(name: &str) -> Option<Rgba> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "navy" => (0, 0, 128),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "violet" => (238, 130, 238),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        "chocolate" => (210, 105, 30),
        "coffee" | "saddlebrown" => (139, 69, 19),
        "beige" => (245, 245, 220),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "teal" => (0, 128, 128),
        "olive" => (128, 128, 0),
        "maroon" => (128, 0, 0),
        "gold" => (255, 215, 0),
        "silver" => (192, 192, 192),
        "ivory" => (255, 255, 240),
        "tan" => (210, 180, 140),
        "transparent" => return Some(Rgba { r: 0, g: 0, b: 0, a: 0.0 }),
        _ => return None,
    };
    Some(Rgba::opaque(r, g, b))
}
