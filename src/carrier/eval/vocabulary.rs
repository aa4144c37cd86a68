//! Mapping of free-text annotations to canonical tags.
//!
//! ClinVar significance strings and VEP consequence terms are matched against the
//! vocabularies here and nowhere else.  Matching is case-insensitive and by substring.

use crate::carrier::ds::TranscriptConsequence;

/// Token marking an aggregate classification as conflicting.
const CONFLICTING_TOKEN: &str = "conflicting";

/// Tokens marking an aggregate classification as pathogenic or likely pathogenic.
const PATHOGENIC_TOKENS: &[&str] = &["pathogenic", "likely_pathogenic"];

/// Submission classifications counting as pathogenic or likely pathogenic.
const PATHOGENIC_SUBMISSION_TERMS: &[&str] = &[
    "pathogenic",
    "likely pathogenic",
    "pathogenic, low penetrance",
    "likely pathogenic, low penetrance",
];

/// Submission classifications that are neither benign nor pathogenic.
///
/// Submissions matching any of these are ignored when resolving conflicts.
const AMBIGUOUS_SUBMISSION_TERMS: &[&str] = &[
    "not provided",
    "other",
    "risk factor",
    "drug response",
    "association",
    "protective",
    "affects",
    "confers sensitivity",
    "uncertain risk allele",
    "likely risk allele",
    "established risk allele",
];

/// Consequence terms of the missense class.
pub const MISSENSE_CONSEQUENCES: &[&str] =
    &["missense_variant", "inframe_insertion", "inframe_deletion"];

/// LOFTEE call for high-confidence loss of function.
const LOF_HIGH_CONFIDENCE: &str = "HC";

/// Canonical tag of an aggregate ClinVar classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnnotationClass {
    /// Pathogenic or likely pathogenic, without conflicts.
    Pathogenic,
    /// Conflicting interpretations between submitters.
    Conflicting,
    /// Anything else (benign, uncertain, ...).
    Other,
}

impl AnnotationClass {
    /// Map a raw aggregate classification, e.g., "Pathogenic/Likely pathogenic".
    pub fn from_raw(clinical_significance: &str) -> Self {
        let sig = clinical_significance.to_lowercase();
        if sig.contains(CONFLICTING_TOKEN) {
            Self::Conflicting
        } else if PATHOGENIC_TOKENS.iter().any(|token| sig.contains(token)) {
            Self::Pathogenic
        } else {
            Self::Other
        }
    }
}

/// Canonical tag of a single ClinVar submission.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionClass {
    /// Pathogenic or likely pathogenic, including low penetrance.
    Pathogenic,
    /// A clear interpretation that is not pathogenic (benign, uncertain, ...).
    NonPathogenic,
    /// No clear interpretation; not counted at all.
    Ambiguous,
}

impl SubmissionClass {
    /// Map a raw submission classification.
    pub fn from_raw(clinical_significance: &str) -> Self {
        let sig = clinical_significance.trim().to_lowercase();
        if AMBIGUOUS_SUBMISSION_TERMS
            .iter()
            .any(|term| sig.contains(term))
        {
            Self::Ambiguous
        } else if PATHOGENIC_SUBMISSION_TERMS
            .iter()
            .any(|term| sig.contains(term))
        {
            Self::Pathogenic
        } else {
            Self::NonPathogenic
        }
    }
}

/// Whether the consequence is a high-confidence loss of function on the canonical transcript.
pub fn is_lof_high_confidence(consequence: &TranscriptConsequence) -> bool {
    consequence.canonical && consequence.lof.as_deref() == Some(LOF_HIGH_CONFIDENCE)
}

/// Whether the consequence is missense-class on the canonical transcript.
pub fn is_missense(consequence: &TranscriptConsequence) -> bool {
    consequence.canonical
        && consequence
            .consequence_terms
            .iter()
            .any(|term| MISSENSE_CONSEQUENCES.contains(&term.as_str()))
}

/// Human-readable label of the first consequence term.
pub fn consequence_label(consequence_terms: &[String]) -> String {
    consequence_terms
        .first()
        .map(|term| term.replace('_', " "))
        .unwrap_or_else(|| "Unknown".to_string())
}
