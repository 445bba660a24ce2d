//! Diagnostic rule table
//!
//! Each rule is an independent descriptor: a trigger predicate, a fixed base
//! confidence and urgency, conditional reasons and a fixed action list.
//! Rules never see each other's output. Order in [`RULES`] is the firing
//! order and breaks confidence ties in the final ranking.

use crate::config::{LOW_LIGHT_THRESHOLD, SOGGY_MOISTURE_THRESHOLD, VERY_DRY_MOISTURE_THRESHOLD};
use crate::models::{ConditionMap, DiagnosisCandidate, SymptomSet, Urgency};

/// Observation state read by rule predicates
pub struct Signals<'a> {
    symptoms: &'a SymptomSet,
    toggles: &'a ConditionMap,
    /// Soggy toggle set, or moisture at/above the soggy threshold
    pub soggy: bool,
    /// Dry toggle set, or moisture at/below the very-dry threshold
    pub very_dry: bool,
    pub light_level: u8,
}

impl<'a> Signals<'a> {
    pub fn new(
        symptoms: &'a SymptomSet,
        toggles: &'a ConditionMap,
        moisture_level: u8,
        light_level: u8,
    ) -> Self {
        let flag = |key: &str| toggles.get(key).copied().unwrap_or(false);
        Self {
            symptoms,
            toggles,
            soggy: flag("soil_soggy") || moisture_level >= SOGGY_MOISTURE_THRESHOLD,
            very_dry: flag("soil_dry") || moisture_level <= VERY_DRY_MOISTURE_THRESHOLD,
            light_level,
        }
    }

    pub fn has(&self, symptom: &str) -> bool {
        self.symptoms.contains(symptom)
    }

    pub fn toggle(&self, flag: &str) -> bool {
        self.toggles.get(flag).copied().unwrap_or(false)
    }

    pub fn low_light(&self) -> bool {
        self.light_level < LOW_LIGHT_THRESHOLD
    }
}

pub type Predicate = for<'a, 'b> fn(&'a Signals<'b>) -> bool;

/// Broad cause family, used by post-passes to find candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Watering,
    Humidity,
    Light,
    Nutrient,
    Fertilizer,
    Pest,
    Unknown,
}

/// A reason line included only when its condition holds
pub struct Reason {
    pub when: Predicate,
    pub text: &'static str,
}

pub struct Rule {
    pub issue: &'static str,
    pub category: Category,
    pub confidence: f64,
    pub urgency: Urgency,
    pub applies: Predicate,
    pub reasons: &'static [Reason],
    pub actions: &'static [&'static str],
}

/// A candidate tagged with the family of the rule that produced it
#[derive(Debug, Clone)]
pub struct Finding {
    pub category: Category,
    pub candidate: DiagnosisCandidate,
}

impl Rule {
    /// Produce this rule's finding if its trigger holds
    pub fn fire(&self, signals: &Signals<'_>) -> Option<Finding> {
        (self.applies)(signals).then(|| self.build(signals))
    }

    /// Produce this rule's finding without checking the trigger
    pub fn build(&self, signals: &Signals<'_>) -> Finding {
        let reasons = self
            .reasons
            .iter()
            .filter(|reason| (reason.when)(signals))
            .map(|reason| reason.text.to_string())
            .collect();

        Finding {
            category: self.category,
            candidate: DiagnosisCandidate {
                issue: self.issue.to_string(),
                confidence: self.confidence,
                urgency: self.urgency,
                reasons,
                actions: self.actions.iter().map(|a| a.to_string()).collect(),
            },
        }
    }
}

fn unconditional(_: &Signals<'_>) -> bool {
    true
}

const fn always(text: &'static str) -> Reason {
    Reason {
        when: unconditional,
        text,
    }
}

fn waterlogged_foliage(s: &Signals<'_>) -> bool {
    s.has("yellowing") || s.has("leaf_drop") || s.has("wilting")
}

const OVERWATERING_REASONS: &[Reason] = &[
    Reason { when: |s| s.has("yellowing"), text: "Yellowing leaves present" },
    Reason { when: |s| s.has("leaf_drop"), text: "Leaf drop reported" },
    Reason { when: |s| s.soggy, text: "Soil reported soggy/high moisture" },
    Reason { when: |s| s.has("mushy_stem"), text: "Mushy stem suggests rot" },
];

const OVERWATERING_ACTIONS: &[&str] = &[
    "Check roots: trim mushy black roots.",
    "Repot in fresh, well-draining mix with drainage holes.",
    "Allow top 1–2 inches to dry before watering again.",
    "Increase airflow; avoid letting pot sit in water.",
];

/// Primary rule battery, in firing order
pub static RULES: &[Rule] = &[
    Rule {
        issue: "Overwatering",
        category: Category::Watering,
        confidence: 0.7,
        urgency: Urgency::Medium,
        applies: |s| waterlogged_foliage(s) && s.soggy && !s.has("mushy_stem"),
        reasons: OVERWATERING_REASONS,
        actions: OVERWATERING_ACTIONS,
    },
    // Escalated form of the rule above; a mushy stem alone is enough.
    Rule {
        issue: "Root rot from overwatering",
        category: Category::Watering,
        confidence: 0.9,
        urgency: Urgency::High,
        applies: |s| waterlogged_foliage(s) && s.has("mushy_stem"),
        reasons: OVERWATERING_REASONS,
        actions: OVERWATERING_ACTIONS,
    },
    Rule {
        issue: "Underwatering",
        category: Category::Watering,
        confidence: 0.75,
        urgency: Urgency::Medium,
        applies: |s| (s.has("wilting") || s.has("browning_tips") || s.has("leaf_drop")) && s.very_dry,
        reasons: &[
            always("Soil very dry"),
            Reason { when: |s| s.has("wilting"), text: "Wilting" },
            Reason { when: |s| s.has("browning_tips"), text: "Brown/crispy tips" },
        ],
        actions: &[
            "Water thoroughly until drainage; empty saucer.",
            "Adopt a schedule; use finger or meter to check moisture.",
            "Consider a slightly larger pot or water-retentive mix if drying too fast.",
        ],
    },
    Rule {
        issue: "Low humidity / dry air",
        category: Category::Humidity,
        confidence: 0.55,
        urgency: Urgency::Low,
        applies: |s| s.has("browning_tips") && !s.soggy && !s.very_dry,
        reasons: &[always("Brown crispy tips without wet/dry extremes")],
        actions: &[
            "Group plants or use a humidifier (40–60%).",
            "Avoid vents/drafts; consider pebble tray.",
        ],
    },
    Rule {
        issue: "Sunburn / light stress",
        category: Category::Light,
        confidence: 0.6,
        urgency: Urgency::Low,
        applies: |s| {
            s.has("sunburn") || (s.toggle("overhead_sun") && (s.has("spots") || s.has("browning_tips")))
        },
        reasons: &[
            Reason { when: |s| s.toggle("overhead_sun"), text: "Direct harsh sun reported" },
            Reason { when: |s| s.has("sunburn"), text: "Bleached/brown patches" },
        ],
        actions: &[
            "Move to bright, indirect light (especially midday).",
            "Acclimate slowly when increasing light.",
        ],
    },
    // Only the overhead-sun toggle rules this out; the sunburn symptom does not.
    Rule {
        issue: "Possible nutrient deficiency (nitrogen or micronutrients)",
        category: Category::Nutrient,
        confidence: 0.45,
        urgency: Urgency::Low,
        applies: |s| s.has("yellowing") && !s.soggy && !s.very_dry && !s.toggle("overhead_sun"),
        reasons: &[always("Yellowing without obvious watering/light issues")],
        actions: &[
            "Use a balanced fertilizer at 1/2 strength monthly in growing season.",
            "Ensure pH-appropriate soil and avoid over-fertilizing.",
        ],
    },
    Rule {
        issue: "Spider mites",
        category: Category::Pest,
        confidence: 0.85,
        urgency: Urgency::Medium,
        applies: |s| s.has("webbing"),
        reasons: &[always("Fine webbing present")],
        actions: &[
            "Isolate plant. Rinse foliage/shower to knock mites off.",
            "Wipe leaves with insecticidal soap or neem; repeat weekly x3.",
            "Increase humidity; mites prefer dry air.",
        ],
    },
    Rule {
        issue: "Mealybugs",
        category: Category::Pest,
        confidence: 0.85,
        urgency: Urgency::Medium,
        applies: |s| s.has("white_cotton"),
        reasons: &[always("White cottony tufts")],
        actions: &[
            "Isolate plant. Dab mealybugs with isopropyl alcohol on cotton swab.",
            "Follow with insecticidal soap/neem weekly x3–4.",
        ],
    },
    Rule {
        issue: "Aphids",
        category: Category::Pest,
        confidence: 0.7,
        urgency: Urgency::Medium,
        applies: |s| s.has("sticky") && (s.has("black_mold") || s.has("stunted")),
        reasons: &[always("Sticky honeydew and/or sooty mold")],
        actions: &[
            "Rinse/new growth. Apply insecticidal soap; repeat weekly.",
            "Prune heavily infested tips. Encourage beneficial insects outdoors.",
        ],
    },
    // Generic sticky fallback; webbing and cotton are more specific and checked above.
    Rule {
        issue: "Scale insects (possible)",
        category: Category::Pest,
        confidence: 0.5,
        urgency: Urgency::Medium,
        applies: |s| (s.has("sticky") && !s.has("webbing") && !s.has("white_cotton")) || s.has("bumps"),
        reasons: &[always("Sticky residue without webbing/cotton; check for hard bumps")],
        actions: &[
            "Scrape/wipe scales with alcohol swab; repeat.",
            "Systemic or horticultural oil per label; isolate plant.",
        ],
    },
    Rule {
        issue: "Chewing pests (caterpillars, beetles, slugs)",
        category: Category::Pest,
        confidence: 0.55,
        urgency: Urgency::Low,
        applies: |s| s.has("holes"),
        reasons: &[always("Holes/chewed edges")],
        actions: &[
            "Night inspection; hand-pick pests.",
            "Use physical barriers; consider BT for caterpillars as labeled.",
        ],
    },
    Rule {
        issue: "Fungus gnats (larvae in wet soil)",
        category: Category::Pest,
        confidence: 0.8,
        urgency: Urgency::Low,
        applies: |s| s.has("tiny_flies") && (s.soggy || !s.very_dry),
        reasons: &[always("Tiny flies plus moist soil")],
        actions: &[
            "Let top 1–2 inches dry between waterings.",
            "Top-dress with sand or use yellow sticky traps.",
            "BTi (mosquito bits) soil drench per label can help.",
        ],
    },
    Rule {
        issue: "Insufficient light",
        category: Category::Light,
        confidence: 0.5,
        urgency: Urgency::Low,
        applies: |s| s.has("leggy") || (s.has("stunted") && s.low_light()),
        reasons: &[always("Stunted/leggy growth at low light")],
        actions: &[
            "Move closer to bright window or add grow light (12–14h).",
            "Rotate plant weekly for even growth.",
        ],
    },
];

/// Added by the fertilizer post-pass, never by the primary battery
pub static SALT_BUILDUP: Rule = Rule {
    issue: "Over-fertilization / salt buildup",
    category: Category::Fertilizer,
    confidence: 0.6,
    urgency: Urgency::Low,
    applies: |s| {
        s.toggle("fertilized") && (s.has("browning_tips") || s.has("leaf_drop") || s.has("spots"))
    },
    reasons: &[
        always("Fertilized recently"),
        Reason { when: |s| s.has("browning_tips"), text: "Brown/crispy tips" },
        Reason { when: |s| s.has("leaf_drop"), text: "Leaf drop" },
        Reason { when: |s| s.has("spots"), text: "Leaf spotting" },
    ],
    actions: &[
        "Flush soil thoroughly with water to leach salts; ensure drainage.",
        "Pause fertilizing for 4–6 weeks; resume at 1/4–1/2 strength.",
        "Remove crusted salts on soil surface if present.",
    ],
};

/// Returned alone when nothing else fires
pub static NO_CLEAR_ISSUE: Rule = Rule {
    issue: "No clear issue detected",
    category: Category::Unknown,
    confidence: crate::config::FALLBACK_CONFIDENCE,
    urgency: Urgency::Low,
    applies: unconditional,
    reasons: &[always("Try adding more specific symptoms from the checklist.")],
    actions: &[
        "Check watering routine and drainage.",
        "Verify light level for plant species.",
        "Inspect closely (top/bottom leaves, stems, nodes) for pests.",
    ],
};
