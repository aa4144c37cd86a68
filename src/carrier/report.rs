//! Text reports rendered from user-supplied templates.
//!
//! Templates contain `{{name}}` placeholders, e.g., "The carrier frequency of
//! {{gene}} is {{carrierFrequencyRatio}} {{source}}."  Unknown names are replaced
//! by the empty string.

use rustc_hash::FxHashMap;

use crate::common::VersionConfig;

use super::{
    eval::{
        result::{EffectiveFrequency, FrequencySource},
        risk::{recurrence_risk, risk_to_percent, ConsultandStatus},
        Evaluation,
    },
    export::{frequency_to_percent, grouped_ratio},
};

/// Public website of gnomAD, for the source attribution.
const GNOMAD_WEBSITE: &str = "https://gnomad.broadinstitute.org";

/// Placeholder pattern, `{{name}}`.
const PLACEHOLDER: &str = r"\{\{(\w+)\}\}";

/// Values for the placeholders of a template.
pub type Context = FxHashMap<String, String>;

fn ratio(value: f64) -> String {
    grouped_ratio(Some(value)).unwrap_or_else(|| "N/A".to_string())
}

/// Attribution of the frequency's source.
fn source_attribution(
    source: &FrequencySource,
    evaluation: &Evaluation,
    version_config: &VersionConfig,
) -> String {
    match source {
        FrequencySource::Computed => {
            format!("({}, {})", version_config.display_name, GNOMAD_WEBSITE)
        }
        FrequencySource::Default if evaluation.carrier_frequency.using_default() => {
            "(default assumption, no gnomAD data)".to_string()
        }
        FrequencySource::Default => "(default assumption)".to_string(),
        FrequencySource::Literature { pmid } => format!("(PMID: {})", pmid),
    }
}

/// Sentence introducing the findings of the consultand.
fn status_intro(status: ConsultandStatus, gene: &str) -> String {
    match status {
        ConsultandStatus::Heterozygous => format!(
            "A heterozygous pathogenic variant in the {} gene was identified in the patient.",
            gene
        ),
        ConsultandStatus::Homozygous => format!(
            "A pathogenic variant in the {} gene was identified in the homozygous state in the patient.",
            gene
        ),
        ConsultandStatus::CompoundHetConfirmed => format!(
            "Two pathogenic variants in the {} gene were identified in compound heterozygous state in the patient.",
            gene
        ),
        ConsultandStatus::CompoundHetAssumed => format!(
            "Two pathogenic variants in the {} gene were identified in the patient. \
             Based on the clinical phenotype, compound heterozygous inheritance is presumed.",
            gene
        ),
    }
}

/// Build the placeholder values for one gene.
///
/// # Arguments
///
/// * `evaluation` - The evaluation of the gene.
/// * `effective` - The carrier frequency chosen for the recurrence risk.
/// * `status` - Status of the consultand.
/// * `version_config` - Configuration of the gnomAD version.
/// * `decimal_places` - Decimal places of percentages.
pub fn build_context(
    evaluation: &Evaluation,
    effective: &EffectiveFrequency,
    status: ConsultandStatus,
    version_config: &VersionConfig,
    decimal_places: usize,
) -> Context {
    let risk = recurrence_risk(effective.carrier_frequency, status);

    [
        ("gene", evaluation.gene.clone()),
        (
            "carrierFrequency",
            frequency_to_percent(Some(effective.carrier_frequency), decimal_places),
        ),
        ("carrierFrequencyRatio", ratio(effective.carrier_frequency)),
        (
            "recurrenceRiskPercent",
            risk_to_percent(risk, decimal_places),
        ),
        ("recurrenceRiskRatio", ratio(risk)),
        (
            "source",
            source_attribution(&effective.source, evaluation, version_config),
        ),
        ("indexStatus", status.to_string()),
        ("statusIntro", status_intro(status, &evaluation.gene)),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

/// Replace the `{{name}}` placeholders of `template` by their values.
///
/// # Errors
///
/// If the placeholder pattern cannot be compiled.
pub fn render_template(template: &str, context: &Context) -> Result<String, anyhow::Error> {
    let re = regex::Regex::new(PLACEHOLDER)?;
    let rendered = re.replace_all(template, |caps: &regex::Captures| {
        let key = &caps[1];
        match context.get(key) {
            Some(value) => value.clone(),
            None => {
                tracing::warn!("template variable {:?} is undefined", key);
                String::new()
            }
        }
    });

    Ok(rendered.into_owned())
}
