use serde::{Deserialize, Serialize};

use crate::errors::{HintError, HintResult};
use crate::model::Variant;

/// Visual style of the labels, which also selects the matching strategy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HintStyle {
    #[default]
    Letter,
    Number,
}

impl From<HintStyle> for Variant {
    fn from(style: HintStyle) -> Self {
        match style {
            HintStyle::Letter => Variant::Letter,
            HintStyle::Number => Variant::Numeric,
        }
    }
}

/// Configuration bundle supplied once when the engine is created.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HintPolicyView {
    pub letter_seq: String,
    pub font: String,
    pub style: HintStyle,
    pub fg_color: String,
    pub bg_color: String,
    pub active_color: String,
    pub normal_color: String,
    pub border: String,
    pub offset_top: f64,
    pub offset_left: f64,
    pub opacity: f64,
    pub mark_hints: bool,
    pub auto_follow: bool,
    pub escape_char: char,
}

impl Default for HintPolicyView {
    fn default() -> Self {
        Self {
            letter_seq: "FDSARTGBVECWXQYIOPMNHZULKJ".to_string(),
            font: "bold 10px monospace".to_string(),
            style: HintStyle::Letter,
            fg_color: "#ffffff".to_string(),
            bg_color: "#000088".to_string(),
            active_color: "#00ff00".to_string(),
            normal_color: "#ffff99".to_string(),
            border: "2px dashed #000000".to_string(),
            offset_top: 0.0,
            offset_left: 0.0,
            opacity: 0.75,
            mark_hints: false,
            auto_follow: true,
            escape_char: '\\',
        }
    }
}

/// Validated configuration with every derived value precomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct HintTheme {
    pub variant: Variant,
    pub alphabet: Vec<char>,
    /// Lowercased alphabet, used to classify typed characters.
    pub alphabet_lower: Vec<char>,
    pub font: String,
    pub big_font: String,
    /// Half the font pixel size; distance under which two labels collide.
    pub collision_size: f64,
    pub fg_color: String,
    pub bg_color: String,
    pub active_color: String,
    pub normal_color: String,
    pub border: String,
    pub offset_top: f64,
    pub offset_left: f64,
    pub opacity: f64,
    pub mark_hints: bool,
    pub auto_follow: bool,
    pub escape_char: char,
}

impl HintPolicyView {
    pub fn validate(&self) -> HintResult<HintTheme> {
        let alphabet: Vec<char> = self.letter_seq.chars().collect();
        if alphabet.len() < 2 {
            return Err(HintError::invalid_config(format!(
                "letter sequence needs at least two letters, got {:?}",
                self.letter_seq
            )));
        }
        let alphabet_lower: Vec<char> = alphabet
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect();
        for (idx, letter) in alphabet_lower.iter().enumerate() {
            if alphabet_lower[..idx].contains(letter) {
                return Err(HintError::invalid_config(format!(
                    "letter sequence repeats {letter:?}"
                )));
            }
            if letter.is_whitespace() {
                return Err(HintError::invalid_config(
                    "letter sequence must not contain whitespace",
                ));
            }
        }
        let escape_lower: Vec<char> = self.escape_char.to_lowercase().collect();
        if escape_lower.iter().any(|c| alphabet_lower.contains(c)) {
            return Err(HintError::invalid_config(format!(
                "escape character {:?} is also a hint letter",
                self.escape_char
            )));
        }
        if self.style == HintStyle::Number && self.escape_char.is_ascii_digit() {
            return Err(HintError::invalid_config(
                "escape character must not be a digit in number style",
            ));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(HintError::invalid_config(format!(
                "opacity must lie in [0, 1], got {}",
                self.opacity
            )));
        }

        let font_px = font_pixel_size(&self.font).ok_or_else(|| {
            HintError::invalid_config(format!("font {:?} carries no pixel size", self.font))
        })?;
        let big_px = (font_px * 1.25).ceil();
        let big_font = replace_pixel_size(&self.font, big_px);

        Ok(HintTheme {
            variant: self.style.into(),
            alphabet,
            alphabet_lower,
            font: self.font.clone(),
            big_font,
            collision_size: font_px / 2.0,
            fg_color: self.fg_color.clone(),
            bg_color: self.bg_color.clone(),
            active_color: hex_to_rgba(&self.active_color, self.opacity)?,
            normal_color: hex_to_rgba(&self.normal_color, self.opacity)?,
            border: self.border.clone(),
            offset_top: self.offset_top,
            offset_left: self.offset_left,
            opacity: self.opacity,
            mark_hints: self.mark_hints,
            auto_follow: self.auto_follow,
            escape_char: self.escape_char,
        })
    }
}

impl HintTheme {
    pub fn stylesheet(&self) -> String {
        format!(
            ".hk-hint {{ position:absolute; z-index:20000; background:{bg}; color:{fg}; \
             border:{border}; font:{font}; display:inline; width:auto; height:auto; \
             padding:0px; margin:0px; opacity:{opacity}; }} \
             .hk-overlay {{ position:absolute!important; display:block!important; \
             z-index:19999; background:{normal}; }}",
            bg = self.bg_color,
            fg = self.fg_color,
            border = self.border,
            font = self.font,
            opacity = self.opacity,
            normal = self.normal_color,
        )
    }

    pub fn notifier_css(&self) -> String {
        format!(
            "bottom:0px;left:0px;position:fixed;z-index:1000;text-overflow:ellipsis;\
             white-space:nowrap;overflow:hidden;max-width:100%;border-right:1px solid #555;\
             border-top:1px solid #555;padding-right:2px;border-radius:0px 5px 0px 0px;\
             letter-spacing:0px;background:{};color:{};font:{};",
            self.bg_color, self.fg_color, self.font
        )
    }
}

fn font_pixel_size(font: &str) -> Option<f64> {
    font.split_whitespace()
        .filter_map(|token| token.split('/').next())
        .filter_map(|token| token.strip_suffix("px"))
        .find_map(|size| size.parse::<f64>().ok())
        .filter(|size| *size > 0.0)
}

fn replace_pixel_size(font: &str, px: f64) -> String {
    let mut replaced = false;
    font.split_whitespace()
        .map(|token| {
            let size = token.split('/').next().unwrap_or(token);
            let is_size = size
                .strip_suffix("px")
                .map_or(false, |n| n.parse::<f64>().is_ok());
            if is_size && !replaced {
                replaced = true;
                format!("{}px{}", px, &token[size.len()..])
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert `#rgb`/`#rrggbb` into a translucent `rgba(..)` at half the hint
/// opacity. Other color syntaxes pass through unchanged.
pub fn hex_to_rgba(color: &str, opacity: f64) -> HintResult<String> {
    let Some(hex) = color.strip_prefix('#') else {
        return Ok(color.to_string());
    };
    let invalid = || HintError::invalid_config(format!("invalid hex color {color:?}"));
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channels: Vec<u8> = match hex.len() {
        3 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|v| (v * 17) as u8))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?,
        6 => (0..3)
            .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    Ok(format!(
        "rgba({},{},{},{})",
        channels[0],
        channels[1],
        channels[2],
        opacity / 2.0
    ))
}
