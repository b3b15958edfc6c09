//! Content-driven font stack selection
//!
//! Card text can arrive in any script; each rendered field picks its font
//! stack from the first matching script in a fixed priority order. This is a
//! content-generation heuristic, not a physics contract; a host that lacks
//! a font simply falls back down its own stack.

/// Script classes with dedicated font stacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontScript {
    Japanese,
    Chinese,
    Korean,
    Thai,
    Arabic,
    Cyrillic,
    Latin,
}

fn in_any(c: char, ranges: &[(u32, u32)]) -> bool {
    let cp = c as u32;
    ranges.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

impl FontScript {
    /// Detect the script of a text. Priority order is fixed: Japanese,
    /// Chinese, Korean, Thai, Arabic, Cyrillic, then Latin. Unified CJK
    /// ideographs up to U+9FAF count as Japanese, so Chinese only wins for
    /// text using the remaining ideograph range.
    pub fn detect(text: &str) -> Self {
        let has_japanese = text
            .chars()
            .any(|c| in_any(c, &[(0x3040, 0x309F), (0x30A0, 0x30FF), (0x4E00, 0x9FAF)]));
        if has_japanese {
            return FontScript::Japanese;
        }
        if text.chars().any(|c| in_any(c, &[(0x4E00, 0x9FFF)])) {
            return FontScript::Chinese;
        }
        if text
            .chars()
            .any(|c| in_any(c, &[(0xAC00, 0xD7AF), (0x1100, 0x11FF)]))
        {
            return FontScript::Korean;
        }
        if text.chars().any(|c| in_any(c, &[(0x0E00, 0x0E7F)])) {
            return FontScript::Thai;
        }
        if text.chars().any(|c| in_any(c, &[(0x0600, 0x06FF)])) {
            return FontScript::Arabic;
        }
        if text.chars().any(|c| in_any(c, &[(0x0400, 0x04FF)])) {
            return FontScript::Cyrillic;
        }
        FontScript::Latin
    }

    /// Font stack hint for this script
    pub fn font_stack(&self) -> &'static str {
        match self {
            FontScript::Japanese => "\"DotGothic16\", monospace",
            FontScript::Chinese => "\"ZCOOL QingKe HuangYou\", \"Noto Sans SC\", sans-serif",
            FontScript::Korean => "\"Noto Sans KR\", sans-serif",
            FontScript::Thai => "\"Noto Sans Thai\", sans-serif",
            FontScript::Arabic => "\"Noto Sans Arabic\", sans-serif",
            FontScript::Cyrillic => "\"Silkscreen\", \"Press Start 2P\", monospace",
            FontScript::Latin => "\"Bitcount Prop Single\", \"DotGothic16\", monospace",
        }
    }
}

/// Font stack for a text, via script detection
pub fn font_stack_for(text: &str) -> &'static str {
    FontScript::detect(text).font_stack()
}
