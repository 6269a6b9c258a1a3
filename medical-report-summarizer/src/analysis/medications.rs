use super::knowledge::{FamilyTrigger, KnowledgeBase, MedicationFamily};
use super::sections::{contains_any, report_lines};

pub const MEDICATION_CUES: &[&str] = &[
    "medication",
    "prescription",
    "drug",
    "taking",
    "prescribed",
];

/// Label-only header lines left out of the prescribed list.
const HEADER_LABELS: &[&str] = &["medication:", "prescription:", "current medications:"];

/// The cue line and the lines after it that are scanned.
const PRESCRIBED_WINDOW: usize = 5;
const MAX_PRESCRIBED: usize = 5;

pub const NO_FAMILY_MATCHED: &str = "• Consult your doctor for appropriate medication";
pub const MEDICATION_DISCLAIMER: &str = "\n**IMPORTANT:** All medications should be taken only as prescribed by a qualified healthcare provider.";

/// Medications already mentioned in the report.
///
/// Looks at the first line carrying a medication cue and the four lines after
/// it, skipping blank lines and bare label headers such as `Medication:`.
pub fn extract_prescribed_medications(lines: &[&str]) -> Vec<String> {
    let Some(start) = lines
        .iter()
        .position(|line| contains_any(&line.to_lowercase(), MEDICATION_CUES))
    else {
        return Vec::new();
    };

    let end = (start + PRESCRIBED_WINDOW).min(lines.len());

    lines[start..end]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !contains_any(&line.to_lowercase(), HEADER_LABELS))
        .take(MAX_PRESCRIBED)
        .map(str::to_string)
        .collect()
}

/// Format the medication block of the summary.
pub fn suggest_medications(
    knowledge: &KnowledgeBase,
    detected_diseases: &[String],
    text: &str,
) -> String {
    let text_lower = text.to_lowercase();
    let diseases_lower: Vec<String> = detected_diseases
        .iter()
        .map(|disease| disease.to_lowercase())
        .collect();

    let mut block = Vec::new();

    let prescribed = extract_prescribed_medications(&report_lines(text));
    if !prescribed.is_empty() {
        block.push("## Currently Prescribed Medications".to_string());
        block.extend(prescribed.iter().map(|med| format!("• {med}")));
        block.push(String::new());
    }

    block.push("## Suggested Medications (Consult Doctor)".to_string());

    let mut family_matched = false;
    for family in &knowledge.medication_families {
        if family_fires(family, &diseases_lower, &text_lower) {
            push_family(&mut block, family);
            family_matched = true;
        }
    }

    if !family_matched {
        block.push(NO_FAMILY_MATCHED.to_string());
    }

    block.push(MEDICATION_DISCLAIMER.to_string());
    block.join("\n")
}

fn family_fires(family: &MedicationFamily, diseases_lower: &[String], text_lower: &str) -> bool {
    match family.trigger {
        FamilyTrigger::DetectedDisease(terms) => diseases_lower
            .iter()
            .any(|disease| contains_any(disease, terms)),
        FamilyTrigger::ReportText(terms) => contains_any(text_lower, terms),
    }
}

fn push_family(block: &mut Vec<String>, family: &MedicationFamily) {
    block.push(format!("\n**For {}:**", family.heading));
    block.extend(family.medications.iter().map(|med| format!("• {med}")));
    block.push(format!("*Note: {}*", family.note));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggest(diseases: &[&str], text: &str) -> String {
        let diseases: Vec<String> = diseases.iter().map(|d| d.to_string()).collect();
        suggest_medications(&KnowledgeBase::standard(), &diseases, text)
    }

    #[test]
    fn prescribed_region_skips_headers_and_blank_lines() {
        let lines = report_lines(
            "History\nCurrent Medications:\nLisinopril 10mg\n\nAspirin 81mg\nVitamin D\nLater line",
        );

        assert_eq!(
            extract_prescribed_medications(&lines),
            vec!["Lisinopril 10mg", "Aspirin 81mg", "Vitamin D"]
        );
    }

    #[test]
    fn prescribed_cue_line_itself_is_kept_when_not_a_header() {
        let lines = report_lines("Patient is taking ibuprofen as needed\nno other concerns");
        assert_eq!(
            extract_prescribed_medications(&lines),
            vec!["Patient is taking ibuprofen as needed", "no other concerns"]
        );
    }

    #[test]
    fn no_cue_means_no_prescribed_section() {
        let block = suggest(&["Asthma"], "Asthma, well");
        assert!(!block.contains("## Currently Prescribed Medications"));
        assert!(block.starts_with("## Suggested Medications (Consult Doctor)"));
        assert!(block.contains(NO_FAMILY_MATCHED));
        assert!(block.ends_with(MEDICATION_DISCLAIMER));
    }

    #[test]
    fn families_follow_priority_order() {
        let block = suggest(&["Hyperlipidemia", "Diabetes Mellitus"], "");
        let diabetes = block.find("**For Diabetes:**").unwrap();
        let cholesterol = block.find("**For High Cholesterol:**").unwrap();

        assert!(diabetes < cholesterol);
        assert!(block.contains("• Metformin 500-1000mg (twice daily)"));
        assert!(block.contains("*Note: Take in the evening for best results*"));
        assert!(!block.contains(NO_FAMILY_MATCHED));
    }

    #[test]
    fn text_triggered_families() {
        let block = suggest(&["No specific disease detected"], "Chest infection with back pain");
        let infection = block.find("**For Infection:**").unwrap();
        let pain = block.find("**For Pain Management:**").unwrap();
        assert!(infection < pain);
        assert!(!block.contains("**For Diabetes:**"));
    }

    #[test]
    fn heart_family_fires_on_myocardial_names() {
        let block = suggest(&["Myocardial Infarction (Heart Attack)"], "");
        assert!(block.contains("**For Heart Condition:**"));
        assert!(block.contains("• Clopidogrel 75mg (once daily)"));
    }

    #[test]
    fn prescribed_section_precedes_suggestions() {
        let block = suggest(&["Hypertension"], "Medication:\nAmlodipine 5mg");
        assert!(block.starts_with(
            "## Currently Prescribed Medications\n• Amlodipine 5mg\n\n## Suggested Medications (Consult Doctor)\n\n**For Hypertension:**"
        ));
    }
}
