//! Commodity name to picture lookup.
//!
//! Names arrive from the bulletin in English or Sinhala and with free-form
//! qualifiers ("Tomato (Local)", "Big Onion - Imported"), so lookups are
//! substring matches over ordered tables: the first row that matches wins.

#[derive(Debug, PartialEq, Eq)]
pub struct VegImage {
    pub key: &'static str,
    pub file: &'static str,
}

impl VegImage {
    pub fn uri(&self) -> String {
        format!("file://{}/{}", ASSET_DIR, self.file)
    }
}

pub const ASSET_DIR: &str = "assets/veggies";

pub static FALLBACK: VegImage = VegImage { key: "default", file: "default.png" };

/// Sinhala spelling -> English name used by `IMAGES`.
static SI_ALIASES: &[(&[&str], &str)] = &[
    (&["තක්කාලි"], "tomato"),
    (&["පිපිඤ්ඤා"], "cucumber"),
    (&["කැරට්"], "carrot"),
    (&["බෝංචි", "දිග බෝංචි", "මෑකරල්"], "long beans"),
    (&["බීට්", "බීට්රූට්"], "beetroot"),
    (&["ලූනු", "ලොකු ලූනු"], "big onion"),
    (&["කරවිල"], "bitter gourd"),
    (&["වම්බටු"], "brinjal"),
    (&["ගෝවා"], "cabbage"),
    (&["අමු මිරිස්", "මිරිස්"], "green chillies"),
    (&["කොල්රාබි", "නෝල්කෝල්"], "knolkhol"),
    (&["බණ්ඩක්කා"], "ladies fingers"),
    (&["ලීක්", "ලීක්ස්"], "leeks"),
    (&["දෙහි"], "lime"),
    // sweet potato before potato: "අල" is contained in "මිහිරි අල"
    (&["බතල", "මිහිරි අල"], "sweet potato"),
    (&["අල"], "potato"),
    (&["වට්ටක්කා"], "pumpkin"),
    (&["රාබු"], "radish"),
    (&["පතෝල"], "snake gourd"),
    (&["අළු කෙසෙල්"], "ash plantains"),
];

static IMAGES: &[(&[&str], VegImage)] = &[
    (&["tomato"], VegImage { key: "tomato", file: "tomato.jpg" }),
    (&["cucumber"], VegImage { key: "cucumber", file: "cucumber.jpg" }),
    (&["carrot"], VegImage { key: "carrot", file: "carrot.jpg" }),
    (&["ash plantains"], VegImage { key: "ash_plantains", file: "ash_plantains.jpg" }),
    (&["long beans"], VegImage { key: "long_beans", file: "long_beans.jpg" }),
    (&["beans"], VegImage { key: "beans", file: "beans.jpg" }),
    (&["beetroot"], VegImage { key: "beetroot", file: "beetroot.webp" }),
    (&["big onion", "red onion"], VegImage { key: "big_onion", file: "big_onion.jpg" }),
    (&["bitter gourd"], VegImage { key: "bitter_gourd", file: "bitter_gourd.jpg" }),
    (&["brinjal"], VegImage { key: "brinjal", file: "brinjal.jpg" }),
    (&["eggplant"], VegImage { key: "eggplant", file: "eggplant.jpg" }),
    (&["cabbage"], VegImage { key: "cabbage", file: "cabbage.jpg" }),
    (&["capsicum", "bell pepper"], VegImage { key: "capsicum", file: "capsicum.webp" }),
    (&["green chillies"], VegImage { key: "green_chillies", file: "green_chillies.webp" }),
    (&["knolkhol", "kohlrabi"], VegImage { key: "knolkhol", file: "knolkhol.jpg" }),
    (&["ladies fingers", "okra"], VegImage { key: "ladies_fingers", file: "ladies_fingers.jpg" }),
    (&["leeks"], VegImage { key: "leeks", file: "leeks.jpg" }),
    (&["lime"], VegImage { key: "lime", file: "lime.jpg" }),
    (&["sweet potato"], VegImage { key: "sweet_potato", file: "sweet_potato.jpg" }),
    (&["potato"], VegImage { key: "potato", file: "potato.jpg" }),
    (&["pumpkin"], VegImage { key: "pumpkin", file: "pumpkin.jpg" }),
    (&["radish"], VegImage { key: "radish", file: "radish.jpg" }),
    (&["snake gourd"], VegImage { key: "snake_gourd", file: "snake_gourd.jpg" }),
    (&["luffa"], VegImage { key: "luffa", file: "luffa.jpg" }),
];

/// Lowercase, collapse whitespace runs to single spaces, trim.
pub fn normalize_name(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn apply_sinhala_aliases(name: String) -> String {
    SI_ALIASES
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| name.contains(k)))
        .map(|(_, to)| to.to_string())
        .unwrap_or(name)
}

pub fn veg_image(commodity: &str) -> &'static VegImage {
    let name = apply_sinhala_aliases(normalize_name(commodity));

    IMAGES
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| name.contains(k)))
        .map(|(_, img)| img)
        .unwrap_or(&FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_matches_its_english_name() {
        for (keys, english) in SI_ALIASES {
            for key in keys.iter() {
                assert_eq!(
                    veg_image(key),
                    veg_image(english),
                    "alias {} should resolve like {}",
                    key,
                    english
                );
                assert_ne!(veg_image(key), &FALLBACK, "alias {} has no picture", key);
            }
        }
    }

    #[test]
    fn unknown_names_fall_back() {
        assert_eq!(veg_image("Durian"), &FALLBACK);
        assert_eq!(veg_image(""), &FALLBACK);
        assert_eq!(veg_image("   "), &FALLBACK);
    }

    #[test]
    fn matching_is_case_and_whitespace_insensitive() {
        assert_eq!(veg_image("  TOMATO  ").key, "tomato");
        assert_eq!(veg_image("Big\t\tOnion (Imported)").key, "big_onion");
        assert_eq!(veg_image("Red   Onion").key, "big_onion");
    }

    #[test]
    fn substring_matches_respect_table_order() {
        assert_eq!(veg_image("Long Beans").key, "long_beans");
        assert_eq!(veg_image("Beans").key, "beans");
        assert_eq!(veg_image("Sweet Potato").key, "sweet_potato");
        assert_eq!(veg_image("Potato (Nuwara Eliya)").key, "potato");
        assert_eq!(veg_image("Okra").key, "ladies_fingers");
    }

    #[test]
    fn sinhala_name_with_qualifier() {
        assert_eq!(veg_image("තක්කාලි (දේශීය)").key, "tomato");
    }

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize_name("  Snake \n Gourd "), "snake gourd");
    }

    #[test]
    fn uri_points_into_asset_dir() {
        assert_eq!(veg_image("lime").uri(), "file://assets/veggies/lime.jpg");
    }
}
