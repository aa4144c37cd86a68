//! Evaluation of the carrier frequency of a gene.
//!
//! The pipeline is: classify each variant, drop manually excluded variants,
//! aggregate the remaining ones per population.

pub mod exclusion;
pub mod filter;
pub mod frequency;
pub mod result;
pub mod risk;
pub mod submissions;
pub mod vocabulary;

use crate::common::{GnomadVersion, Settings, VersionConfig};

use self::{
    exclusion::Exclusions,
    filter::{Decision, FilterConfig},
    result::{CarrierFrequency, EffectiveFrequency, FrequencyChoice, FrequencySource},
    risk::{ConsultandStatus, RecurrenceRisk},
};

use super::data::{clinvar::Submissions, gnomad::Data as GeneData};

/// Classification of one variant of the gene.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ClassifiedVariant {
    /// Identifier of the form `CHROM-POS-REF-ALT`.
    pub variant_id: String,
    /// The classifier's decision.
    pub decision: Decision,
    /// Whether the variant was excluded manually.
    pub excluded: bool,
}

impl ClassifiedVariant {
    /// Whether the variant counts towards the carrier frequency.
    pub fn is_qualifying(&self) -> bool {
        self.decision.is_included() && !self.excluded
    }
}

/// Result of evaluating one gene.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Evaluation {
    /// Gene symbol.
    pub gene: String,
    /// The gnomAD version used.
    pub version: GnomadVersion,
    /// The filters applied.
    pub filters: FilterConfig,
    /// All variants of the gene with their classification, in input order.
    pub variants: Vec<ClassifiedVariant>,
    /// The carrier frequency result.
    pub carrier_frequency: CarrierFrequency,
}

/// Evaluator for the carrier frequency of genes of one gnomAD version.
#[derive(Debug, Clone)]
pub struct Evaluator {
    /// Configuration of the gnomAD version.
    version_config: VersionConfig,
    /// Thresholds and defaults.
    settings: Settings,
}

impl Evaluator {
    /// Construct for the given version with the given settings.
    pub fn new(version: GnomadVersion, settings: Settings) -> Self {
        Self {
            version_config: version.config(),
            settings,
        }
    }

    /// The configuration of the gnomAD version.
    pub fn version_config(&self) -> &VersionConfig {
        &self.version_config
    }

    /// The settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Evaluate the carrier frequency of one gene.
    ///
    /// # Arguments
    ///
    /// * `data` - Variants and ClinVar annotations of the gene.
    /// * `filters` - The filter configuration.
    /// * `submissions` - Submissions for resolving conflicting classifications.
    /// * `exclusions` - Manually excluded variants.  Exclusions made for another
    ///   gene are ignored.
    ///
    /// # Returns
    ///
    /// The evaluation result.
    pub fn evaluate(
        &self,
        data: &GeneData,
        filters: &FilterConfig,
        submissions: &Submissions,
        exclusions: &Exclusions,
    ) -> Evaluation {
        tracing::debug!(
            "evaluating {} with {} variants ({})",
            data.symbol(),
            data.variants().len(),
            filters.description()
        );
        if filters.include_conflicting {
            let missing = filter::conflicting_variant_ids(data.clinvar_variants())
                .into_iter()
                .filter(|variant_id| submissions.by_variant_id(variant_id).is_none())
                .count();
            if missing > 0 {
                tracing::warn!(
                    "no submissions for {} variant(s) with conflicting classification",
                    missing
                );
            }
        }

        let mut exclusions = exclusions.clone();
        if !exclusions.is_empty() && exclusions.gene_symbol() != Some(data.symbol()) {
            tracing::warn!(
                "ignoring {} exclusion(s) made for gene {}",
                exclusions.len(),
                exclusions.gene_symbol().unwrap_or("<none>")
            );
        }
        exclusions.reset_for_gene(data.symbol());

        let variants = data
            .variants()
            .iter()
            .map(|variant| ClassifiedVariant {
                variant_id: variant.variant_id.clone(),
                decision: filter::classify(
                    variant,
                    data.clinvar_by_variant_id(&variant.variant_id),
                    filters,
                    Some(submissions),
                ),
                excluded: exclusions.is_excluded(&variant.variant_id),
            })
            .collect::<Vec<_>>();
        let qualifying = data
            .variants()
            .iter()
            .zip(variants.iter())
            .filter(|(_, classified)| classified.is_qualifying())
            .map(|(variant, _)| variant)
            .collect::<Vec<_>>();

        let carrier_frequency =
            frequency::summarize(&qualifying, &self.version_config, &self.settings);
        if carrier_frequency.using_default() {
            tracing::info!(
                "no qualifying variants for {}, using default carrier frequency {}",
                data.symbol(),
                self.settings.default_carrier_frequency
            );
        } else {
            tracing::info!(
                "{} qualifying variants for {}",
                qualifying.len(),
                data.symbol()
            );
        }

        Evaluation {
            gene: data.symbol().to_string(),
            version: self.version_config.version,
            filters: filters.clone(),
            variants,
            carrier_frequency,
        }
    }

    /// The carrier frequency chosen to drive the recurrence risk.
    ///
    /// Returns `None` if gnomAD is chosen and no global frequency is available.
    pub fn effective_frequency(
        &self,
        carrier_frequency: &CarrierFrequency,
        choice: &FrequencyChoice,
    ) -> Option<EffectiveFrequency> {
        match choice {
            FrequencyChoice::Gnomad => {
                carrier_frequency
                    .global_carrier_frequency
                    .map(|freq| EffectiveFrequency {
                        carrier_frequency: freq,
                        source: carrier_frequency.source.clone(),
                    })
            }
            FrequencyChoice::Literature(literature) => Some(EffectiveFrequency {
                carrier_frequency: literature.carrier_frequency,
                source: FrequencySource::Literature {
                    pmid: literature.pmid.clone(),
                },
            }),
            FrequencyChoice::Default => Some(EffectiveFrequency {
                carrier_frequency: self.settings.default_carrier_frequency,
                source: FrequencySource::Default,
            }),
        }
    }

    /// Recurrence risk based on the given carrier frequency.
    pub fn recurrence_risk(
        &self,
        effective: &EffectiveFrequency,
        status: ConsultandStatus,
    ) -> RecurrenceRisk {
        RecurrenceRisk::new(
            effective.carrier_frequency,
            status,
            self.settings.frequency_decimal_places,
        )
    }
}
