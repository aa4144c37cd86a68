//! Classification of variants as pathogenic for the carrier frequency calculation.

use crate::carrier::{
    data::clinvar::Submissions,
    ds::{ClinvarVariant, Variant},
};

use super::{
    submissions::{meets_threshold, pathogenic_percentage},
    vocabulary::{is_lof_high_confidence, is_missense, AnnotationClass},
};

/// User-controlled variant filter settings.
///
/// The star threshold is assumed to be within `0..=4` and the conflicting threshold
/// within `50..=100`; both are clamped by the caller.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Include high-confidence loss-of-function variants (LOFTEE HC, canonical transcript).
    pub lof_hc_enabled: bool,
    /// Include missense-class variants that have qualifying ClinVar evidence.
    pub missense_enabled: bool,
    /// Use ClinVar pathogenic/likely pathogenic classifications as evidence.
    pub clinvar_enabled: bool,
    /// Minimal number of ClinVar gold stars.
    pub clinvar_star_threshold: u8,
    /// Include variants with conflicting classifications based on their submissions.
    pub include_conflicting: bool,
    /// Minimal percentage of pathogenic submissions for conflicting variants.
    pub conflicting_threshold: u8,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            lof_hc_enabled: true,
            missense_enabled: true,
            clinvar_enabled: true,
            clinvar_star_threshold: 1,
            include_conflicting: false,
            conflicting_threshold: 80,
        }
    }
}

impl FilterConfig {
    /// Human-readable summary of the active filters, e.g., "LoF HC, ClinVar >= 1 star".
    pub fn description(&self) -> String {
        let mut parts = Vec::new();
        if self.lof_hc_enabled {
            parts.push("LoF HC".to_string());
        }
        if self.missense_enabled {
            parts.push("Missense".to_string());
        }
        if self.clinvar_enabled {
            let stars = if self.clinvar_star_threshold == 1 {
                "1 star".to_string()
            } else {
                format!("{} stars", self.clinvar_star_threshold)
            };
            parts.push(format!("ClinVar >= {}", stars));
            if self.include_conflicting {
                parts.push(format!(
                    "Conflicting >= {}% P/LP",
                    self.conflicting_threshold
                ));
            }
        }

        if parts.is_empty() {
            "No filters active".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// ClinVar evidence that qualifies a variant.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinvarEvidence {
    /// Pathogenic or likely pathogenic classification.
    Pathogenic,
    /// Conflicting classification where enough submissions are pathogenic.
    ConflictingResolved {
        /// Percentage of pathogenic submissions.
        pathogenic_percentage: f64,
    },
}

/// Outcome of the classification of one variant.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// High-confidence loss of function.
    LofHc,
    /// Missense-class variant corroborated by ClinVar.
    Missense(ClinvarEvidence),
    /// Other consequence with ClinVar evidence.
    Clinvar(ClinvarEvidence),
    /// Does not qualify.
    Excluded,
}

impl Decision {
    /// Whether the variant counts as pathogenic.
    pub fn is_included(&self) -> bool {
        !matches!(self, Decision::Excluded)
    }
}

/// Determine the qualifying ClinVar evidence of a variant, if any.
///
/// Both the plain and the conflicting case require the annotation to reach the
/// configured star threshold.
fn clinvar_evidence(
    annotation: Option<&ClinvarVariant>,
    config: &FilterConfig,
    submissions: Option<&Submissions>,
) -> Option<ClinvarEvidence> {
    if !config.clinvar_enabled {
        return None;
    }
    let annotation = annotation?;
    if annotation.gold_stars < config.clinvar_star_threshold {
        return None;
    }

    match AnnotationClass::from_raw(&annotation.clinical_significance) {
        AnnotationClass::Pathogenic => Some(ClinvarEvidence::Pathogenic),
        AnnotationClass::Conflicting if config.include_conflicting => {
            let submissions = submissions?.by_variant_id(&annotation.variant_id)?;
            if !meets_threshold(submissions, f64::from(config.conflicting_threshold)) {
                return None;
            }
            pathogenic_percentage(submissions).map(|pathogenic_percentage| {
                ClinvarEvidence::ConflictingResolved {
                    pathogenic_percentage,
                }
            })
        }
        _ => None,
    }
}

/// Classify one variant.
///
/// Rules in order of precedence:
///
/// 1. high-confidence LoF is included on its own if enabled,
/// 2. missense-class needs the missense filter *and* ClinVar evidence,
/// 3. all other consequences need ClinVar evidence.
///
/// # Arguments
///
/// * `variant` - The variant to classify.
/// * `annotation` - The ClinVar annotation of the variant, if any.
/// * `config` - The filter configuration.
/// * `submissions` - Submissions for resolving conflicting classifications.
pub fn classify(
    variant: &Variant,
    annotation: Option<&ClinvarVariant>,
    config: &FilterConfig,
    submissions: Option<&Submissions>,
) -> Decision {
    let consequence = variant.transcript_consequence.as_ref();
    let lof_hc = consequence.is_some_and(is_lof_high_confidence);
    let missense = consequence.is_some_and(is_missense);

    let decision = if config.lof_hc_enabled && lof_hc {
        Decision::LofHc
    } else {
        match (missense, clinvar_evidence(annotation, config, submissions)) {
            (true, Some(evidence)) if config.missense_enabled => Decision::Missense(evidence),
            (true, _) => Decision::Excluded,
            (false, Some(evidence)) => Decision::Clinvar(evidence),
            (false, None) => Decision::Excluded,
        }
    };
    tracing::trace!("{} -> {:?}", &variant.variant_id, &decision);

    decision
}

/// Keep the variants that classify as pathogenic.
///
/// # Arguments
///
/// * `variants` - The variants of a gene.
/// * `annotations` - ClinVar annotations of the same gene.
/// * `config` - The filter configuration.
/// * `submissions` - Submissions for resolving conflicting classifications.
pub fn filter_pathogenic_variants<'a>(
    variants: &'a [Variant],
    annotations: &[ClinvarVariant],
    config: &FilterConfig,
    submissions: Option<&Submissions>,
) -> Vec<&'a Variant> {
    let mut by_variant_id = rustc_hash::FxHashMap::default();
    for annotation in annotations {
        by_variant_id
            .entry(annotation.variant_id.as_str())
            .or_insert(annotation);
    }

    variants
        .iter()
        .filter(|variant| {
            let annotation = by_variant_id.get(variant.variant_id.as_str()).copied();
            classify(variant, annotation, config, submissions).is_included()
        })
        .collect()
}

/// Identifiers of annotations with conflicting classifications.
///
/// These are the variants for which submissions need to be fetched.
pub fn conflicting_variant_ids(annotations: &[ClinvarVariant]) -> Vec<String> {
    annotations
        .iter()
        .filter(|annotation| {
            AnnotationClass::from_raw(&annotation.clinical_significance)
                == AnnotationClass::Conflicting
        })
        .map(|annotation| annotation.variant_id.clone())
        .collect()
}
