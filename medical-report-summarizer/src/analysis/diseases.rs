use super::knowledge::{KnowledgeBase, NO_DISEASE_DETECTED};
use super::sections::contains_any;

/// Canonical names of every disease with a keyword present in `text`.
///
/// Each disease is tested independently and the result keeps table order.
/// Never empty: falls back to [`NO_DISEASE_DETECTED`].
pub fn detect_diseases(knowledge: &KnowledgeBase, text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();

    let detected: Vec<String> = knowledge
        .diseases
        .iter()
        .filter(|entry| contains_any(&text_lower, entry.keywords))
        .map(|entry| entry.name.to_string())
        .collect();

    if detected.is_empty() {
        vec![NO_DISEASE_DETECTED.to_string()]
    } else {
        detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<String> {
        detect_diseases(&KnowledgeBase::standard(), text)
    }

    #[test]
    fn keyword_free_text_yields_sentinel() {
        assert_eq!(detect("Routine visit, no complaints."), vec![NO_DISEASE_DETECTED]);
        assert_eq!(detect(""), vec![NO_DISEASE_DETECTED]);
    }

    #[test]
    fn matches_are_case_insensitive_and_use_canonical_names() {
        assert_eq!(detect("History of ASTHMA since childhood"), vec!["Asthma"]);
        assert_eq!(detect("Known DIABETIC on diet control"), vec!["Diabetes Mellitus"]);
    }

    #[test]
    fn result_follows_table_order_not_text_order() {
        let detected = detect("Osteoporosis noted. Also pneumonia, and hypertension.");
        assert_eq!(detected, vec!["Hypertension", "Pneumonia", "Osteoporosis"]);
    }

    #[test]
    fn several_diseases_can_match_one_report() {
        let detected = detect("heart attack with coronary occlusion");
        assert_eq!(
            detected,
            vec!["Myocardial Infarction (Heart Attack)", "Coronary Artery Disease"]
        );
    }
}
