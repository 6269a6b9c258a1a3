use super::knowledge::{KnowledgeBase, RecoveryScope};

pub const RECOVERY_CAVEAT: &str = "\n**Note:** Recovery times are estimates and vary by individual. Follow your doctor's guidance.";

/// Format the recovery-time block of the summary.
///
/// Each detected disease takes the first recovery condition found either in
/// its own name or, for most conditions, anywhere in the report. The generic
/// estimate is used only when no disease matched at all.
pub fn estimate_recovery_time(
    knowledge: &KnowledgeBase,
    detected_diseases: &[String],
    text: &str,
) -> String {
    let text_lower = text.to_lowercase();
    let mut block = vec!["## Estimated Recovery Time".to_string()];
    let mut matched_any = false;

    for disease in detected_diseases {
        let disease_lower = disease.to_lowercase();
        let entry = knowledge.recovery_times.iter().find(|entry| {
            disease_lower.contains(entry.condition)
                || (entry.scope == RecoveryScope::DiseaseOrReport
                    && text_lower.contains(entry.condition))
        });

        if let Some(entry) = entry {
            block.push(format!("\n**{disease}:**"));
            block.push(format!("• {}", entry.recovery_time));
            matched_any = true;
        }
    }

    if !matched_any {
        block.push(format!("\n• {}", knowledge.generic_recovery));
    }

    block.push(RECOVERY_CAVEAT.to_string());
    block.join("\n")
}
