//! Export of evaluation results as flat records.

use crate::{
    carrier::{
        data::gnomad::Data as GeneData,
        ds::Variant,
        eval::{
            exclusion::Exclusions,
            filter::FilterConfig,
            result::{CarrierFrequency, EffectiveFrequency, FrequencySource, PopulationFrequency},
            risk::format_fixed,
            vocabulary::{consequence_label, is_lof_high_confidence, AnnotationClass},
            ClassifiedVariant, Evaluation,
        },
    },
    common::{GnomadVersion, VersionConfig},
};

/// Text used for frequencies that are not available.
const NOT_DETECTED: &str = "Not detected";
/// Placeholder for missing values in export records.
const NO_VALUE: &str = "-";

/// Format a frequency as percentage, e.g., "4.00%".
pub fn frequency_to_percent(frequency: Option<f64>, decimal_places: usize) -> String {
    match frequency {
        Some(frequency) => format!("{}%", format_fixed(frequency * 100.0, decimal_places)),
        None => NOT_DETECTED.to_string(),
    }
}

/// Group the digits of `value` by thousands, e.g., "2,500".
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// "1:N" ratio with grouped digits, `None` for missing or zero frequencies.
pub(crate) fn grouped_ratio(frequency: Option<f64>) -> Option<String> {
    frequency
        .filter(|frequency| *frequency > 0.0)
        .map(|frequency| format!("1:{}", group_thousands((1.0 / frequency).round() as u64)))
}

/// Format a frequency as "1:N" ratio for display, e.g., "1:2,500".
pub fn frequency_to_ratio(frequency: Option<f64>) -> String {
    grouped_ratio(frequency).unwrap_or_else(|| NOT_DETECTED.to_string())
}

/// Format a frequency as "1:N" ratio for export records, "-" if not detected.
pub fn export_ratio(frequency: Option<f64>) -> String {
    grouped_ratio(frequency).unwrap_or_else(|| NO_VALUE.to_string())
}

/// Format an allele frequency for display.
///
/// Very small values are written in scientific notation.
pub fn format_allele_frequency(frequency: Option<f64>) -> String {
    match frequency {
        None => NO_VALUE.to_string(),
        Some(frequency) if frequency == 0.0 => "0".to_string(),
        Some(frequency) if frequency < 1e-4 => format!("{:.2e}", frequency),
        Some(frequency) => format!("{:.6}", frequency),
    }
}

/// Summary record of an evaluation.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ExportSummary {
    /// Gene symbol.
    pub gene: String,
    /// Global carrier frequency, `None` if not detected.
    pub global_carrier_frequency: Option<f64>,
    /// Global carrier frequency as percentage.
    pub global_carrier_frequency_percent: String,
    /// Global carrier frequency as "1:N" ratio.
    pub global_carrier_frequency_ratio: String,
    /// Allele count summed over qualifying variants.
    pub global_allele_count: u64,
    /// Representative global allele number.
    pub global_allele_number: u64,
    /// Number of qualifying variants.
    pub qualifying_variant_count: usize,
    /// Smallest population frequency.
    pub min_frequency: Option<f64>,
    /// Largest population frequency.
    pub max_frequency: Option<f64>,
    /// Whether any population shows a founder effect.
    pub has_founder_effect: bool,
    /// Whether the global frequency is the configured default.
    pub using_default: bool,
    /// Carrier frequency used for the recurrence risk, if one was chosen.
    pub effective_carrier_frequency: Option<f64>,
    /// Source of the effective carrier frequency.
    pub effective_frequency_source: Option<FrequencySource>,
}

impl ExportSummary {
    /// Construct from the carrier frequency result of a gene.
    ///
    /// # Arguments
    ///
    /// * `gene` - Gene symbol.
    /// * `result` - The carrier frequency result.
    /// * `effective` - The frequency chosen for the recurrence risk, if any.
    /// * `decimal_places` - Decimal places of percentages.
    pub fn new(
        gene: &str,
        result: &CarrierFrequency,
        effective: Option<&EffectiveFrequency>,
        decimal_places: usize,
    ) -> Self {
        Self {
            gene: gene.to_string(),
            global_carrier_frequency: result.global_carrier_frequency,
            global_carrier_frequency_percent: frequency_to_percent(
                result.global_carrier_frequency,
                decimal_places,
            ),
            global_carrier_frequency_ratio: export_ratio(result.global_carrier_frequency),
            global_allele_count: result.global_allele_count,
            global_allele_number: result.global_allele_number,
            qualifying_variant_count: result.qualifying_variant_count,
            min_frequency: result.min_frequency,
            max_frequency: result.max_frequency,
            has_founder_effect: result.has_founder_effect,
            using_default: result.using_default(),
            effective_carrier_frequency: effective.map(|e| e.carrier_frequency),
            effective_frequency_source: effective.map(|e| e.source.clone()),
        }
    }
}

/// Population record, also used for the TSV output.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ExportPopulation {
    /// Population code.
    pub code: String,
    /// Display label.
    pub label: String,
    /// Carrier frequency, `None` if not detected.
    pub carrier_frequency: Option<f64>,
    /// Carrier frequency as percentage.
    pub carrier_frequency_percent: String,
    /// Carrier frequency as "1:N" ratio.
    pub carrier_frequency_ratio: String,
    /// Allele count summed over qualifying variants.
    pub allele_count: u64,
    /// Representative allele number.
    pub allele_number: u64,
    /// Allele number is below the low sample size threshold.
    pub is_low_sample_size: bool,
    /// Population shows a founder effect.
    pub is_founder_effect: bool,
}

impl ExportPopulation {
    /// Construct from a population result.
    pub fn new(population: &PopulationFrequency, decimal_places: usize) -> Self {
        Self {
            code: population.code.clone(),
            label: population.label.clone(),
            carrier_frequency: population.carrier_frequency,
            carrier_frequency_percent: frequency_to_percent(
                population.carrier_frequency,
                decimal_places,
            ),
            carrier_frequency_ratio: export_ratio(population.carrier_frequency),
            allele_count: population.allele_count,
            allele_number: population.allele_number,
            is_low_sample_size: population.is_low_sample_size,
            is_founder_effect: population.is_founder_effect,
        }
    }
}

/// Variant record.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ExportVariant {
    /// Identifier of the form `CHROM-POS-REF-ALT`.
    pub variant_id: String,
    /// Consequence label, e.g., "stop gained".
    pub consequence: String,
    /// Allele frequency over both cohorts, `None` without sequenced alleles.
    pub allele_frequency: Option<f64>,
    /// Allele frequency for display.
    pub allele_frequency_display: String,
    /// Allele count over both cohorts.
    pub allele_count: u64,
    /// Allele number over both cohorts.
    pub allele_number: u64,
    /// Coding HGVS notation.
    pub hgvsc: Option<String>,
    /// Protein HGVS notation.
    pub hgvsp: Option<String>,
    /// ClinVar clinical significance.
    pub clinvar_status: Option<String>,
    /// High-confidence loss of function.
    pub is_lof: bool,
    /// ClinVar classifies the variant as P/LP.
    pub is_clinvar_pathogenic: bool,
    /// Counts towards the carrier frequency.
    pub is_qualifying: bool,
    /// Excluded manually.
    pub excluded: bool,
    /// Label of the exclusion reason.
    pub exclusion_reason: Option<String>,
}

impl ExportVariant {
    /// Construct the record of one classified variant.
    pub fn new(
        variant: &Variant,
        classified: &ClassifiedVariant,
        data: &GeneData,
        exclusions: &Exclusions,
    ) -> Self {
        let (allele_count, allele_number) = variant.total_counts();
        let allele_frequency =
            (allele_number > 0).then(|| allele_count as f64 / allele_number as f64);
        let consequence = variant.transcript_consequence.as_ref();
        let annotation = data.clinvar_by_variant_id(&variant.variant_id);

        Self {
            variant_id: variant.variant_id.clone(),
            consequence: consequence_label(
                consequence
                    .map(|c| c.consequence_terms.as_slice())
                    .unwrap_or_default(),
            ),
            allele_frequency,
            allele_frequency_display: format_allele_frequency(allele_frequency),
            allele_count,
            allele_number,
            hgvsc: consequence.and_then(|c| c.hgvsc.clone()),
            hgvsp: consequence.and_then(|c| c.hgvsp.clone()),
            clinvar_status: annotation.map(|a| a.clinical_significance.clone()),
            is_lof: consequence.is_some_and(is_lof_high_confidence),
            is_clinvar_pathogenic: annotation.is_some_and(|a| {
                AnnotationClass::from_raw(&a.clinical_significance) == AnnotationClass::Pathogenic
            }),
            is_qualifying: classified.is_qualifying(),
            excluded: classified.excluded,
            exclusion_reason: if classified.excluded {
                exclusions
                    .reason(&variant.variant_id)
                    .map(|reason| reason.label())
            } else {
                None
            },
        }
    }
}

/// Metadata of an export.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ExportMetadata {
    /// The gnomAD version.
    pub gnomad_version: GnomadVersion,
    /// Display name of the gnomAD version.
    pub gnomad_display_name: String,
    /// The filters applied.
    pub filters_applied: FilterConfig,
    /// Human-readable description of the filters.
    pub filters_description: String,
    /// Version of this tool.
    pub tool_version: String,
}

impl ExportMetadata {
    /// Construct for the given version and filters.
    pub fn new(version_config: &VersionConfig, filters: &FilterConfig) -> Self {
        Self {
            gnomad_version: version_config.version,
            gnomad_display_name: version_config.display_name.clone(),
            filters_applied: filters.clone(),
            filters_description: filters.description(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// All records of an export.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ExportData {
    /// The summary.
    pub summary: ExportSummary,
    /// One record per population, sorted as in the evaluation.
    pub populations: Vec<ExportPopulation>,
    /// One record per variant of the gene.
    pub variants: Vec<ExportVariant>,
    /// The metadata.
    pub metadata: ExportMetadata,
}

impl ExportData {
    /// Build the export of an evaluation.
    ///
    /// # Arguments
    ///
    /// * `evaluation` - The evaluation to export.
    /// * `data` - The gene data the evaluation was computed from.
    /// * `version_config` - Configuration of the gnomAD version.
    /// * `exclusions` - Manual exclusions, for the reasons.
    /// * `effective` - The frequency chosen for the recurrence risk, if any.
    /// * `decimal_places` - Decimal places of percentages.
    pub fn new(
        evaluation: &Evaluation,
        data: &GeneData,
        version_config: &VersionConfig,
        exclusions: &Exclusions,
        effective: Option<&EffectiveFrequency>,
        decimal_places: usize,
    ) -> Self {
        Self {
            summary: ExportSummary::new(
                &evaluation.gene,
                &evaluation.carrier_frequency,
                effective,
                decimal_places,
            ),
            populations: evaluation
                .carrier_frequency
                .populations
                .iter()
                .map(|population| ExportPopulation::new(population, decimal_places))
                .collect(),
            variants: data
                .variants()
                .iter()
                .zip(evaluation.variants.iter())
                .map(|(variant, classified)| {
                    ExportVariant::new(variant, classified, data, exclusions)
                })
                .collect(),
            metadata: ExportMetadata::new(version_config, &evaluation.filters),
        }
    }
}

/// Write population records as TSV with header.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn write_populations_tsv<W>(writer: W, populations: &[ExportPopulation]) -> Result<(), anyhow::Error>
where
    W: std::io::Write,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(writer);
    for population in populations {
        csv_writer
            .serialize(population)
            .map_err(|e| anyhow::anyhow!("problem writing record: {}", e))?;
    }
    csv_writer
        .flush()
        .map_err(|e| anyhow::anyhow!("problem flushing output: {}", e))?;
    tracing::debug!("wrote {} population records", populations.len());

    Ok(())
}
