//! Single-shot extraction of headed regions from a report.

pub const DEMOGRAPHIC_CUES: &[&str] = &["patient", "name", "age", "dob", "gender"];
pub const DIAGNOSIS_CUES: &[&str] = &["diagnosis", "diagnoses", "impression", "assessment"];
pub const FINDINGS_CUES: &[&str] = &["findings", "results", "examination", "test"];
pub const RECOMMENDATION_CUES: &[&str] = &[
    "recommendation",
    "treatment",
    "plan",
    "medication",
    "prescription",
];

/// Lines scanned after the heading line.
const CONTINUATION_WINDOW: usize = 3;

/// Split report text into lines the way every analysis step sees them.
///
/// Splits on `'\n'` only, so an empty text is a single empty line.
pub fn report_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Return the first region whose heading line contains one of `cues`.
///
/// The region is the trimmed heading line plus the non-empty trimmed lines
/// among the next three. Later matches are ignored.
pub fn extract_section(lines: &[&str], cues: &[&str]) -> Vec<String> {
    let Some(start) = lines
        .iter()
        .position(|line| contains_any(&line.to_lowercase(), cues))
    else {
        return Vec::new();
    };

    let end = (start + 1 + CONTINUATION_WINDOW).min(lines.len());

    std::iter::once(lines[start].trim())
        .chain(
            lines[start + 1..end]
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty()),
        )
        .map(str::to_string)
        .collect()
}
