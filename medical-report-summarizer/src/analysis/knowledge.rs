//! Curated lookup tables behind the analysis engine.
//!
//! A [`KnowledgeBase`] is built once at startup and shared read-only (usually
//! behind an `Arc`) by every analysis call. Every table is an ordered `Vec`:
//! detection, medication and diet output follow the declared order, never the
//! order in which terms appear in a report.

/// Returned by disease detection when no keyword matched.
pub const NO_DISEASE_DETECTED: &str = "No specific disease detected";

const GENERIC_RECOVERY: &str = "Recovery time varies by condition - follow doctor's advice";

/// A canonical disease and the lowercase keywords that reveal it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseEntry {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Where a medication family looks for its trigger terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyTrigger {
    /// Substrings of the lowercased detected disease names
    DetectedDisease(&'static [&'static str]),
    /// Substrings of the lowercased report text
    ReportText(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationFamily {
    pub heading: &'static str,
    pub medications: &'static [&'static str],
    pub note: &'static str,
    pub trigger: FamilyTrigger,
}

/// Where a recovery condition is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryScope {
    /// The detected disease name or anywhere in the report
    DiseaseOrReport,
    /// The detected disease name only
    DiseaseName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryEntry {
    pub condition: &'static str,
    pub recovery_time: &'static str,
    pub scope: RecoveryScope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietEntry {
    pub condition: &'static str,
    pub triggers: &'static [&'static str],
    pub foods: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    pub diseases: Vec<DiseaseEntry>,
    /// Emitted in this order regardless of detection order
    pub medication_families: Vec<MedicationFamily>,
    pub recovery_times: Vec<RecoveryEntry>,
    pub generic_recovery: &'static str,
    pub diets: Vec<DietEntry>,
    pub general_diet: &'static [&'static str],
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::standard()
    }
}

impl KnowledgeBase {
    pub fn standard() -> Self {
        Self {
            diseases: standard_diseases(),
            medication_families: standard_medication_families(),
            recovery_times: standard_recovery_times(),
            generic_recovery: GENERIC_RECOVERY,
            diets: standard_diets(),
            general_diet: &[
                "Colorful vegetables and fruits",
                "Whole grains",
                "Lean proteins (chicken, fish, legumes)",
                "Healthy fats (nuts, seeds, olive oil)",
                "Stay hydrated (8 glasses of water daily)",
                "Limit processed foods and added sugars",
            ],
        }
    }

    pub fn disease(&self, name: &str) -> Option<&DiseaseEntry> {
        self.diseases.iter().find(|entry| entry.name == name)
    }

    pub fn medication_family(&self, heading: &str) -> Option<&MedicationFamily> {
        self.medication_families
            .iter()
            .find(|family| family.heading == heading)
    }

    pub fn diet(&self, condition: &str) -> Option<&DietEntry> {
        self.diets.iter().find(|entry| entry.condition == condition)
    }
}

fn standard_diseases() -> Vec<DiseaseEntry> {
    vec![
        DiseaseEntry {
            name: "Diabetes Mellitus",
            keywords: &["diabetes", "diabetic", "hyperglycemia", "blood sugar", "glucose"],
        },
        DiseaseEntry {
            name: "Hypertension",
            keywords: &["hypertension", "high blood pressure", "elevated bp"],
        },
        DiseaseEntry {
            name: "Myocardial Infarction (Heart Attack)",
            keywords: &["myocardial infarction", "heart attack", "mi", "stemi", "nstemi"],
        },
        DiseaseEntry {
            name: "Coronary Artery Disease",
            keywords: &["coronary artery disease", "cad", "coronary"],
        },
        DiseaseEntry {
            name: "Hyperlipidemia",
            keywords: &["hyperlipidemia", "high cholesterol", "dyslipidemia"],
        },
        DiseaseEntry {
            name: "Pneumonia",
            keywords: &["pneumonia"],
        },
        DiseaseEntry {
            name: "Bronchitis",
            keywords: &["bronchitis"],
        },
        DiseaseEntry {
            name: "Asthma",
            keywords: &["asthma"],
        },
        DiseaseEntry {
            name: "COPD",
            keywords: &["copd", "chronic obstructive pulmonary"],
        },
        DiseaseEntry {
            name: "Stroke",
            keywords: &["stroke", "cerebrovascular accident", "cva"],
        },
        DiseaseEntry {
            name: "Gastritis",
            keywords: &["gastritis"],
        },
        DiseaseEntry {
            name: "Peptic Ulcer",
            keywords: &["ulcer", "peptic ulcer"],
        },
        DiseaseEntry {
            name: "Arthritis",
            keywords: &["arthritis"],
        },
        DiseaseEntry {
            name: "Osteoporosis",
            keywords: &["osteoporosis"],
        },
        DiseaseEntry {
            name: "Anemia",
            keywords: &["anemia", "anaemia"],
        },
        DiseaseEntry {
            name: "Thyroid Disorder",
            keywords: &["hypothyroid", "hyperthyroid", "thyroid"],
        },
        DiseaseEntry {
            name: "Kidney Disease",
            keywords: &["kidney disease", "renal", "nephropathy"],
        },
        DiseaseEntry {
            name: "Liver Disease",
            keywords: &["liver disease", "hepatitis", "cirrhosis"],
        },
    ]
}

fn standard_medication_families() -> Vec<MedicationFamily> {
    vec![
        MedicationFamily {
            heading: "Diabetes",
            medications: &[
                "Metformin 500-1000mg (twice daily)",
                "Glipizide 5-10mg (before meals)",
                "Insulin (as prescribed by doctor)",
            ],
            note: "Consult doctor before taking any medication",
            trigger: FamilyTrigger::DetectedDisease(&["diabetes"]),
        },
        MedicationFamily {
            heading: "Hypertension",
            medications: &[
                "Lisinopril 10-20mg (once daily)",
                "Amlodipine 5-10mg (once daily)",
                "Losartan 50-100mg (once daily)",
            ],
            note: "Blood pressure should be monitored regularly",
            trigger: FamilyTrigger::DetectedDisease(&["hypertension"]),
        },
        MedicationFamily {
            heading: "Heart Condition",
            medications: &[
                "Aspirin 81-325mg (once daily)",
                "Clopidogrel 75mg (once daily)",
                "Atorvastatin 40-80mg (once daily)",
                "Beta-blockers (as prescribed)",
            ],
            note: "Emergency medications - follow cardiologist's prescription",
            trigger: FamilyTrigger::DetectedDisease(&["heart", "myocardial"]),
        },
        MedicationFamily {
            heading: "High Cholesterol",
            medications: &[
                "Atorvastatin 10-80mg (once daily)",
                "Rosuvastatin 5-40mg (once daily)",
                "Simvastatin 20-40mg (once daily)",
            ],
            note: "Take in the evening for best results",
            trigger: FamilyTrigger::DetectedDisease(&["cholesterol", "lipid"]),
        },
        MedicationFamily {
            heading: "Infection",
            medications: &[
                "Amoxicillin 500mg (three times daily)",
                "Azithromycin 500mg (once daily)",
                "Ciprofloxacin 500mg (twice daily)",
            ],
            note: "Complete the full course of antibiotics",
            trigger: FamilyTrigger::ReportText(&["infection", "pneumonia", "bronchitis"]),
        },
        MedicationFamily {
            heading: "Pain Management",
            medications: &[
                "Ibuprofen 400-600mg (every 6-8 hours)",
                "Acetaminophen 500-1000mg (every 4-6 hours)",
                "Naproxen 250-500mg (twice daily)",
            ],
            note: "Take with food to avoid stomach upset",
            trigger: FamilyTrigger::ReportText(&["pain", "ache"]),
        },
    ]
}

fn standard_recovery_times() -> Vec<RecoveryEntry> {
    use RecoveryScope::{DiseaseName, DiseaseOrReport};

    const CARDIAC_RECOVERY: &str =
        "6-8 weeks for initial recovery; 3-6 months for full cardiac rehabilitation";

    // A family history of heart attack must not override the patient's own
    // conditions, so the cardiac rows only match detected disease names.
    let table: &[(&str, &str, RecoveryScope)] = &[
        (
            "diabetes",
            "Ongoing management - Blood sugar control typically improves in 2-3 months with medication and lifestyle changes",
            DiseaseOrReport,
        ),
        (
            "hypertension",
            "2-4 weeks for blood pressure to stabilize with medication; ongoing management required",
            DiseaseOrReport,
        ),
        ("heart attack", CARDIAC_RECOVERY, DiseaseName),
        ("myocardial infarction", CARDIAC_RECOVERY, DiseaseName),
        (
            "stroke",
            "3-6 months for significant recovery; ongoing rehabilitation may be needed",
            DiseaseOrReport,
        ),
        (
            "pneumonia",
            "1-3 weeks with antibiotics; full recovery in 4-6 weeks",
            DiseaseOrReport,
        ),
        (
            "bronchitis",
            "7-10 days for acute bronchitis; 2-3 weeks for full recovery",
            DiseaseOrReport,
        ),
        (
            "flu",
            "5-7 days for symptoms to improve; 1-2 weeks for full recovery",
            DiseaseOrReport,
        ),
        ("cold", "7-10 days for complete recovery", DiseaseOrReport),
        (
            "fracture",
            "6-8 weeks for bone healing; 3-6 months for full strength recovery",
            DiseaseOrReport,
        ),
        ("sprain", "2-6 weeks depending on severity", DiseaseOrReport),
        (
            "surgery",
            "2-6 weeks for initial healing; 3-6 months for full recovery (varies by procedure)",
            DiseaseOrReport,
        ),
        (
            "infection",
            "7-14 days with antibiotics; varies by infection type",
            DiseaseOrReport,
        ),
        (
            "gastritis",
            "2-4 weeks with medication and dietary changes",
            DiseaseOrReport,
        ),
        ("ulcer", "4-8 weeks with medication", DiseaseOrReport),
        (
            "asthma",
            "Ongoing management - symptoms improve in days with proper medication",
            DiseaseOrReport,
        ),
        (
            "copd",
            "Ongoing management - exacerbations improve in 1-2 weeks with treatment",
            DiseaseOrReport,
        ),
        ("general", GENERIC_RECOVERY, DiseaseOrReport),
    ];

    table
        .iter()
        .map(|&(condition, recovery_time, scope)| RecoveryEntry {
            condition,
            recovery_time,
            scope,
        })
        .collect()
}

fn standard_diets() -> Vec<DietEntry> {
    vec![
        DietEntry {
            condition: "diabetes",
            triggers: &["diabetes", "diabetic", "glucose", "blood sugar"],
            foods: &[
                "Leafy greens (spinach, kale, collard greens)",
                "Whole grains (brown rice, quinoa, oats)",
                "Fatty fish (salmon, mackerel, sardines)",
                "Nuts and seeds (almonds, walnuts, chia seeds)",
                "Beans and legumes",
                "Greek yogurt (unsweetened)",
                "Berries (blueberries, strawberries)",
                "Avoid: Sugary drinks, white bread, processed foods",
            ],
        },
        DietEntry {
            condition: "hypertension",
            triggers: &["hypertension", "high blood pressure", "bp"],
            foods: &[
                "Bananas (high in potassium)",
                "Leafy greens (spinach, Swiss chard)",
                "Berries (rich in antioxidants)",
                "Oats and whole grains",
                "Beets and beet juice",
                "Fatty fish (omega-3 rich)",
                "Garlic and herbs (instead of salt)",
                "Avoid: Excessive salt, processed meats, alcohol",
            ],
        },
        DietEntry {
            condition: "heart",
            triggers: &["heart", "cardiac", "myocardial", "coronary"],
            foods: &[
                "Fatty fish (salmon, tuna, sardines)",
                "Walnuts and almonds",
                "Berries and dark chocolate (70%+ cocoa)",
                "Leafy green vegetables",
                "Whole grains (oatmeal, brown rice)",
                "Avocados (healthy fats)",
                "Olive oil (extra virgin)",
                "Avoid: Trans fats, excessive red meat, fried foods",
            ],
        },
        DietEntry {
            condition: "cholesterol",
            triggers: &["cholesterol", "lipid", "ldl", "hdl"],
            foods: &[
                "Oats and barley (soluble fiber)",
                "Beans and lentils",
                "Nuts (almonds, walnuts)",
                "Fatty fish (omega-3)",
                "Fruits (apples, grapes, strawberries)",
                "Soy products (tofu, soy milk)",
                "Olive oil",
                "Avoid: Saturated fats, trans fats, organ meats",
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_lowercase_and_non_empty() {
        let knowledge = KnowledgeBase::standard();
        let all_keywords = knowledge
            .diseases
            .iter()
            .flat_map(|entry| entry.keywords.iter())
            .chain(knowledge.diets.iter().flat_map(|entry| entry.triggers.iter()))
            .chain(knowledge.recovery_times.iter().map(|entry| &entry.condition));

        for keyword in all_keywords {
            assert!(!keyword.is_empty());
            assert_eq!(*keyword, keyword.to_lowercase(), "{keyword} is not lowercase");
        }
    }

    #[test]
    fn medication_families_keep_priority_order() {
        let headings: Vec<_> = KnowledgeBase::standard()
            .medication_families
            .iter()
            .map(|family| family.heading)
            .collect();

        assert_eq!(
            headings,
            vec![
                "Diabetes",
                "Hypertension",
                "Heart Condition",
                "High Cholesterol",
                "Infection",
                "Pain Management",
            ]
        );
    }

    #[test]
    fn general_recovery_row_comes_last() {
        let knowledge = KnowledgeBase::standard();
        let last = knowledge.recovery_times.last().unwrap();

        assert_eq!(last.condition, "general");
        assert_eq!(last.recovery_time, knowledge.generic_recovery);
        assert_eq!(knowledge.recovery_times.len(), 18);
    }

    #[test]
    fn lookups_by_name() {
        let knowledge = KnowledgeBase::default();
        assert_eq!(knowledge.diseases.len(), 18);
        assert!(knowledge.disease("Hyperlipidemia").is_some());
        assert!(knowledge.disease("Gout").is_none());
        assert_eq!(knowledge.diet("diabetes").map(|d| d.foods.len()), Some(8));
        assert_eq!(
            knowledge.medication_family("Diabetes").map(|f| f.medications[0]),
            Some("Metformin 500-1000mg (twice daily)")
        );
        assert_eq!(knowledge.general_diet.len(), 6);
    }
}
