//! Result structures of the carrier frequency calculation.

/// Where a carrier frequency came from.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Default,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FrequencySource {
    /// Computed from qualifying variants.
    #[default]
    Computed,
    /// The configured default frequency, either chosen or because no variant qualified.
    Default,
    /// A published value.
    Literature {
        /// PubMed identifier of the publication.
        pmid: String,
    },
}

/// A carrier frequency taken from a publication.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LiteratureFrequency {
    /// The published carrier frequency.
    pub carrier_frequency: f64,
    /// PubMed identifier of the publication.
    pub pmid: String,
}

impl LiteratureFrequency {
    /// Construct after validation.
    ///
    /// # Errors
    ///
    /// If the frequency is not in `(0, 1]` or the PMID is blank.
    pub fn new(carrier_frequency: f64, pmid: &str) -> Result<Self, anyhow::Error> {
        if !(carrier_frequency > 0.0 && carrier_frequency <= 1.0) {
            anyhow::bail!(
                "literature frequency must be in (0, 1], got {}",
                carrier_frequency
            );
        }
        let pmid = pmid.trim();
        if pmid.is_empty() {
            anyhow::bail!("literature frequency requires a PMID");
        }
        Ok(Self {
            carrier_frequency,
            pmid: pmid.to_string(),
        })
    }
}

/// Which carrier frequency drives the recurrence risk.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FrequencyChoice {
    /// The global frequency computed from gnomAD.
    #[default]
    Gnomad,
    /// A published frequency.
    Literature(LiteratureFrequency),
    /// The configured default frequency.
    Default,
}

/// The carrier frequency used for the recurrence risk, with its source.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EffectiveFrequency {
    /// The carrier frequency.
    pub carrier_frequency: f64,
    /// Where it came from.
    pub source: FrequencySource,
}

/// Carrier frequency of one population.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PopulationFrequency {
    /// Population code, e.g., "nfe".
    pub code: String,
    /// Display label, e.g., "European (non-Finnish)".
    pub label: String,
    /// Carrier frequency, `None` if not detected.
    pub carrier_frequency: Option<f64>,
    /// Allele count summed over qualifying variants.
    pub allele_count: u64,
    /// Representative allele number (largest exome AN plus largest genome AN).
    pub allele_number: u64,
    /// Allele number is below the low sample size threshold.
    pub is_low_sample_size: bool,
    /// Frequency exceeds the global frequency by the founder effect multiplier.
    pub is_founder_effect: bool,
}

/// Result of the carrier frequency calculation for one gene.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CarrierFrequency {
    /// Global carrier frequency, `None` if not detected.
    pub global_carrier_frequency: Option<f64>,
    /// Source of the global carrier frequency.
    pub source: FrequencySource,
    /// Allele count summed over qualifying variants.
    pub global_allele_count: u64,
    /// Representative global allele number.
    pub global_allele_number: u64,
    /// Number of qualifying variants.
    pub qualifying_variant_count: usize,
    /// Smallest non-null population frequency.
    pub min_frequency: Option<f64>,
    /// Largest non-null population frequency.
    pub max_frequency: Option<f64>,
    /// Whether any population is flagged as founder effect.
    pub has_founder_effect: bool,
    /// Per-population results, descending by frequency with undetected last.
    pub populations: Vec<PopulationFrequency>,
}

impl CarrierFrequency {
    /// Whether the global frequency is the configured default.
    pub fn using_default(&self) -> bool {
        self.source == FrequencySource::Default
    }
}

#[cfg(test)]
mod test {
    use super::{FrequencySource, LiteratureFrequency};

    #[rstest::rstest]
    #[case(0.02, "12345678", true)]
    #[case(1.0, " 12345678 ", true)]
    #[case(0.0, "12345678", false)]
    #[case(1.5, "12345678", false)]
    #[case(f64::NAN, "12345678", false)]
    #[case(0.02, "  ", false)]
    fn literature_frequency(#[case] frequency: f64, #[case] pmid: &str, #[case] valid: bool) {
        let res = LiteratureFrequency::new(frequency, pmid);

        assert_eq!(res.is_ok(), valid, "{:?}", res);
        if let Ok(literature) = res {
            assert_eq!(literature.pmid, "12345678");
        }
    }

    #[test]
    fn frequency_source_serde() -> Result<(), anyhow::Error> {
        assert_eq!(
            serde_json::to_string(&FrequencySource::Default)?,
            r#""default""#
        );
        assert_eq!(
            serde_json::to_string(&FrequencySource::Literature {
                pmid: "12345678".into()
            })?,
            r#"{"literature":{"pmid":"12345678"}}"#
        );

        Ok(())
    }
}
