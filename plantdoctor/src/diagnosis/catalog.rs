//! Symptom and condition catalogs
//!
//! The fixed vocabulary a UI shell offers the user. Rules only ever test
//! membership of these identifiers.

use serde::Serialize;

/// One selectable catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub label: &'static str,
}

const fn entry(id: &'static str, label: &'static str) -> CatalogEntry {
    CatalogEntry { id, label }
}

/// Observable symptoms
pub const SYMPTOMS: &[CatalogEntry] = &[
    entry("yellowing", "Yellowing leaves"),
    entry("browning_tips", "Brown/crispy tips"),
    entry("wilting", "Wilting/drooping"),
    entry("leaf_drop", "Leaves dropping"),
    entry("mushy_stem", "Mushy stem or base"),
    entry("spots", "Leaf spots or blotches"),
    entry("holes", "Holes/chewed edges"),
    entry("webbing", "Fine webbing on leaves"),
    entry("white_cotton", "White cottony tufts"),
    entry("sticky", "Sticky residue (honeydew)"),
    entry("tiny_flies", "Tiny flies around soil"),
    entry("black_mold", "Sooty/black mold"),
    entry("stunted", "Stunted or distorted growth"),
    entry("sunburn", "Bleached/brown sunburn patches"),
    entry("leggy", "Leggy, stretched growth"),
    entry("bumps", "Hard bumps on stems or leaves"),
];

/// Environmental condition toggles
pub const TOGGLES: &[CatalogEntry] = &[
    entry("soil_soggy", "Soil feels soggy"),
    entry("soil_dry", "Soil feels very dry"),
    entry("soil_compact", "Soil is tightly packed"),
    entry("soil_loose", "Soil is loose and airy"),
    entry("overhead_sun", "Gets direct overhead sun"),
    entry("fertilized", "Fertilized recently"),
];

/// Look up a symptom by id
pub fn symptom(id: &str) -> Option<&'static CatalogEntry> {
    SYMPTOMS.iter().find(|e| e.id == id)
}

/// Look up a condition toggle by id
pub fn toggle(id: &str) -> Option<&'static CatalogEntry> {
    TOGGLES.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let symptoms: HashSet<_> = SYMPTOMS.iter().map(|e| e.id).collect();
        assert_eq!(symptoms.len(), SYMPTOMS.len());

        let toggles: HashSet<_> = TOGGLES.iter().map(|e| e.id).collect();
        assert_eq!(toggles.len(), TOGGLES.len());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(symptom("webbing").unwrap().label, "Fine webbing on leaves");
        assert_eq!(toggle("fertilized").unwrap().id, "fertilized");
        assert!(symptom("fertilized").is_none());
        assert!(toggle("unknown").is_none());
    }
}
