use std::sync::Arc;

use tracing::debug;

use super::diet::{format_food_list, recommend_foods};
use super::diseases::detect_diseases;
use super::follow_up::resolve_follow_up;
use super::knowledge::KnowledgeBase;
use super::medications::suggest_medications;
use super::recovery::estimate_recovery_time;
use super::sections::{
    DEMOGRAPHIC_CUES, DIAGNOSIS_CUES, FINDINGS_CUES, RECOMMENDATION_CUES, extract_section,
    report_lines,
};
use crate::models::SummaryResult;

const MAX_DEMOGRAPHIC_LINES: usize = 3;
const MAX_SECTION_LINES: usize = 5;
const FALLBACK_MIN_LINE_CHARS: usize = 20;
const FALLBACK_MAX_LINES: usize = 15;

/// Turns extracted report text into a structured summary.
///
/// Stateless apart from the shared, read-only [`KnowledgeBase`], so one
/// instance can serve any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct Summarizer {
    knowledge: Arc<KnowledgeBase>,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(Arc::new(KnowledgeBase::standard()))
    }
}

impl Summarizer {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub fn detect_diseases(&self, report_text: &str) -> Vec<String> {
        detect_diseases(&self.knowledge, report_text)
    }

    pub fn suggest_medications(&self, detected_diseases: &[String], report_text: &str) -> String {
        suggest_medications(&self.knowledge, detected_diseases, report_text)
    }

    pub fn estimate_recovery_time(&self, detected_diseases: &[String], report_text: &str) -> String {
        estimate_recovery_time(&self.knowledge, detected_diseases, report_text)
    }

    /// Summarize one report.
    ///
    /// `context_chunks` are passages retrieved from previously ingested
    /// reports; they are accepted for retrieval-augmented callers but the
    /// extraction below is driven by `report_text` alone.
    pub fn generate_summary(&self, report_text: &str, context_chunks: &[String]) -> SummaryResult {
        let lines = report_lines(report_text);

        let demographics = extract_section(&lines, DEMOGRAPHIC_CUES);
        let diagnoses = extract_section(&lines, DIAGNOSIS_CUES);
        let findings = extract_section(&lines, FINDINGS_CUES);
        let recommendations = extract_section(&lines, RECOMMENDATION_CUES);

        let detected_diseases = self.detect_diseases(report_text);
        let follow_up_date = resolve_follow_up(report_text);
        let medications = self.suggest_medications(&detected_diseases, report_text);
        let recovery_time = self.estimate_recovery_time(&detected_diseases, report_text);
        let foods = recommend_foods(&self.knowledge, report_text);

        debug!(
            diseases = ?detected_diseases,
            context_chunks = context_chunks.len(),
            %follow_up_date,
            "report analysed"
        );

        let mut parts = Vec::new();

        if !demographics.is_empty() {
            parts.push(headed_block(
                "Patient Demographics",
                &demographics[..demographics.len().min(MAX_DEMOGRAPHIC_LINES)],
            ));
        }

        let conditions: Vec<String> = detected_diseases
            .iter()
            .map(|disease| format!("• {disease}"))
            .collect();
        parts.push(headed_block("Detected Conditions", &conditions));

        for (heading, section) in [
            ("Primary Diagnoses", &diagnoses),
            ("Key Findings", &findings),
            ("Treatment Recommendations", &recommendations),
        ] {
            if !section.is_empty() {
                parts.push(headed_block(
                    heading,
                    &section[..section.len().min(MAX_SECTION_LINES)],
                ));
            }
        }

        parts.push(medications.clone());
        parts.push(recovery_time.clone());

        if !follow_up_date.is_empty() {
            parts.push(format!("## Follow-up\n{follow_up_date}"));
        }

        if !foods.is_empty() {
            parts.push(format!(
                "## Recommended Foods & Diet\n{}",
                format_food_list(&foods)
            ));
        }

        // Only reachable if the always-present blocks above become optional.
        let summary_text = if parts.is_empty() {
            fallback_summary(&lines)
        } else {
            parts.join("\n\n")
        };

        SummaryResult {
            summary_text,
            follow_up_date,
            detected_diseases,
            medications,
            recovery_time,
        }
    }
}

fn headed_block(heading: &str, lines: &[String]) -> String {
    format!("## {heading}\n{}", lines.join("\n"))
}

/// Plain summary built from the first substantial lines of the report.
pub fn fallback_summary(lines: &[&str]) -> String {
    let meaningful: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| line.chars().count() > FALLBACK_MIN_LINE_CHARS)
        .take(FALLBACK_MAX_LINES)
        .collect();

    format!("## Medical Report Summary\n\n{}", meaningful.join("\n"))
}
