//! Built-in swatch palettes.
//!
//! A palette is only a source of suggested colours; the pattern's own colour
//! list is separate and is what cells index into.

use crate::types::Rgb;

pub const CUSTOM_PALETTE_ID: &str = "custom";
pub const DEFAULT_PALETTE_ID: &str = "classic";

pub struct Palette {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: &'static [Rgb],
}

pub const BUILTIN_PALETTES: &[Palette] = &[
    Palette {
        id: "classic",
        name: "Classic",
        colors: &[
            Rgb::new(0x00, 0x00, 0x00),
            Rgb::new(0xE6, 0x39, 0x46),
            Rgb::new(0xF4, 0xA2, 0x61),
            Rgb::new(0xE9, 0xC4, 0x6A),
            Rgb::new(0x2A, 0x9D, 0x8F),
            Rgb::new(0x26, 0x46, 0x53),
            Rgb::new(0x45, 0x7B, 0x9D),
            Rgb::new(0xA8, 0xDA, 0xDC),
        ],
    },
    Palette {
        id: "pastel",
        name: "Pastel",
        colors: &[
            Rgb::new(0xFF, 0xAD, 0xAD),
            Rgb::new(0xFF, 0xD6, 0xA5),
            Rgb::new(0xFD, 0xFF, 0xB6),
            Rgb::new(0xCA, 0xFF, 0xBF),
            Rgb::new(0x9B, 0xF6, 0xFF),
            Rgb::new(0xA0, 0xC4, 0xFF),
            Rgb::new(0xBD, 0xB2, 0xFF),
            Rgb::new(0xFF, 0xC6, 0xFF),
        ],
    },
    Palette {
        id: "earth",
        name: "Earth",
        colors: &[
            Rgb::new(0x58, 0x3E, 0x23),
            Rgb::new(0x8C, 0x5E, 0x34),
            Rgb::new(0xB0, 0x89, 0x68),
            Rgb::new(0x6B, 0x70, 0x5C),
            Rgb::new(0xA5, 0xA5, 0x8D),
            Rgb::new(0xCB, 0x99, 0x7E),
        ],
    },
    Palette {
        id: "mono",
        name: "Mono",
        colors: &[
            Rgb::new(0x00, 0x00, 0x00),
            Rgb::new(0x40, 0x40, 0x40),
            Rgb::new(0x80, 0x80, 0x80),
            Rgb::new(0xC0, 0xC0, 0xC0),
        ],
    },
];

pub fn builtin(id: &str) -> Option<&'static Palette> {
    BUILTIN_PALETTES.iter().find(|p| p.id == id)
}

/// Known ids are the built-ins plus `custom` (only when a custom palette exists).
pub fn is_known_id(id: &str, custom: Option<&[Rgb]>) -> bool {
    builtin(id).is_some() || (id == CUSTOM_PALETTE_ID && custom.is_some())
}

/// Swatches offered for `id`; unknown ids fall back to the default palette.
pub fn swatches<'a>(id: &str, custom: Option<&'a [Rgb]>) -> &'a [Rgb] {
    if id == CUSTOM_PALETTE_ID {
        if let Some(colors) = custom {
            return colors;
        }
    }
    builtin(id)
        .or_else(|| builtin(DEFAULT_PALETTE_ID))
        .map(|p| p.colors)
        .unwrap_or(&[])
}

/// The id after `id` in cycling order (built-ins, then `custom` if present).
pub fn next_palette_id(id: &str, has_custom: bool) -> &'static str {
    let mut ids: Vec<&'static str> = BUILTIN_PALETTES.iter().map(|p| p.id).collect();
    if has_custom {
        ids.push(CUSTOM_PALETTE_ID);
    }
    let pos = ids.iter().position(|&i| i == id);
    match pos {
        Some(p) => ids[(p + 1) % ids.len()],
        None => DEFAULT_PALETTE_ID,
    }
}

/// First swatch not already among `used`, if any.
pub fn first_unused(swatches: &[Rgb], used: &[Rgb]) -> Option<Rgb> {
    swatches.iter().copied().find(|c| !used.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_falls_back_to_default() {
        assert_eq!(swatches("nope", None), builtin(DEFAULT_PALETTE_ID).unwrap().colors);
        assert!(!is_known_id("nope", None));
        assert!(!is_known_id(CUSTOM_PALETTE_ID, None));
    }

    #[test]
    fn custom_palette_is_used_when_present() {
        let custom = [Rgb::new(1, 2, 3)];
        assert_eq!(swatches(CUSTOM_PALETTE_ID, Some(&custom)), &custom);
        assert!(is_known_id(CUSTOM_PALETTE_ID, Some(&custom)));
    }

    #[test]
    fn cycling_wraps_and_includes_custom() {
        assert_eq!(next_palette_id("classic", false), "pastel");
        assert_eq!(next_palette_id("mono", false), "classic");
        assert_eq!(next_palette_id("mono", true), CUSTOM_PALETTE_ID);
        assert_eq!(next_palette_id(CUSTOM_PALETTE_ID, true), "classic");
    }

    #[test]
    fn first_unused_skips_pattern_colours() {
        let sw = [Rgb::BLACK, Rgb::WHITE];
        assert_eq!(first_unused(&sw, &[Rgb::BLACK]), Some(Rgb::WHITE));
        assert_eq!(first_unused(&sw, &sw), None);
    }
}
