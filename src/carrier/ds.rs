//! Shared data structures for `carrier`.
//!
//! The field names follow the gnomAD GraphQL schema so that the records can be
//! deserialized directly from API responses.

/// Annotation of a variant on its transcript.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct TranscriptConsequence {
    /// Gene symbol.
    #[serde(default)]
    pub gene_symbol: Option<String>,
    /// Transcript identifier.
    #[serde(default)]
    pub transcript_id: Option<String>,
    /// Whether this is the canonical transcript.
    #[serde(default)]
    pub canonical: bool,
    /// Sequence ontology consequence terms.
    #[serde(default)]
    pub consequence_terms: Vec<String>,
    /// LOFTEE loss-of-function call ("HC", "LC", "OS").
    #[serde(default)]
    pub lof: Option<String>,
    /// LOFTEE filter.
    #[serde(default)]
    pub lof_filter: Option<String>,
    /// LOFTEE flags.
    #[serde(default)]
    pub lof_flags: Option<String>,
    /// HGVS coding notation, e.g., `c.1234A>G`.
    #[serde(default)]
    pub hgvsc: Option<String>,
    /// HGVS protein notation, e.g., `p.Met123Val`.
    #[serde(default)]
    pub hgvsp: Option<String>,
}

/// Allele counts of one population in one cohort.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct PopulationCounts {
    /// Population code.
    pub id: String,
    /// Allele count.
    pub ac: u64,
    /// Allele number.
    pub an: u64,
}

/// Allele counts of one cohort (exomes or genomes).
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct Cohort {
    /// Total allele count.
    pub ac: u64,
    /// Total allele number.
    pub an: u64,
    /// Per-population breakdown.
    #[serde(default)]
    pub populations: Vec<PopulationCounts>,
}

impl Cohort {
    /// Counts for the population with the given code, if any.
    pub fn population(&self, code: &str) -> Option<&PopulationCounts> {
        self.populations.iter().find(|p| p.id == code)
    }
}

/// A variant as returned by gnomAD.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct Variant {
    /// Identifier of the form `CHROM-POS-REF-ALT`.
    pub variant_id: String,
    /// 1-based position.
    pub pos: u64,
    /// Reference allele.
    #[serde(rename = "ref")]
    pub ref_allele: String,
    /// Alternate allele.
    #[serde(rename = "alt")]
    pub alt_allele: String,
    /// Exome cohort counts.
    #[serde(default)]
    pub exome: Option<Cohort>,
    /// Genome cohort counts.
    #[serde(default)]
    pub genome: Option<Cohort>,
    /// Annotation on the canonical transcript.
    #[serde(default)]
    pub transcript_consequence: Option<TranscriptConsequence>,
}

impl Variant {
    /// Allele count and number summed over both cohorts.
    pub fn total_counts(&self) -> (u64, u64) {
        [&self.exome, &self.genome]
            .into_iter()
            .flatten()
            .fold((0, 0), |(ac, an), c| (ac + c.ac, an + c.an))
    }
}

/// ClinVar annotation of a variant, as aggregated over all submitters.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct ClinvarVariant {
    /// Identifier of the form `CHROM-POS-REF-ALT`.
    pub variant_id: String,
    /// Free-text clinical significance, e.g., "Pathogenic/Likely pathogenic".
    pub clinical_significance: String,
    /// Review status in gold stars (0-4).
    pub gold_stars: u8,
    /// Review status text.
    #[serde(default)]
    pub review_status: String,
    /// 1-based position.
    #[serde(default)]
    pub pos: u64,
    /// Reference allele.
    #[serde(default, rename = "ref")]
    pub ref_allele: String,
    /// Alternate allele.
    #[serde(default, rename = "alt")]
    pub alt_allele: String,
}

/// One submission to ClinVar by a single laboratory.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
pub struct ClinvarSubmission {
    /// Free-text clinical significance of the submission.
    pub clinical_significance: String,
}

impl ClinvarSubmission {
    /// Construct with the given clinical significance.
    pub fn new(clinical_significance: &str) -> Self {
        Self {
            clinical_significance: clinical_significance.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Cohort, PopulationCounts, Variant};

    fn counts(id: &str, ac: u64, an: u64) -> PopulationCounts {
        PopulationCounts {
            id: id.into(),
            ac,
            an,
        }
    }

    #[test]
    fn counts_sum_cohorts() {
        let variant = Variant {
            variant_id: "1-100-A-G".into(),
            exome: Some(Cohort {
                ac: 3,
                an: 300,
                populations: vec![counts("nfe", 2, 200), counts("afr", 1, 100)],
            }),
            genome: Some(Cohort {
                ac: 1,
                an: 50,
                populations: vec![counts("nfe", 1, 50)],
            }),
            ..Default::default()
        };

        let exome = variant.exome.as_ref().expect("exome is set");
        assert_eq!(exome.population("afr").map(|p| (p.ac, p.an)), Some((1, 100)));
        assert!(exome.population("eas").is_none());
        assert_eq!(variant.total_counts(), (4, 350));
    }

    #[test]
    fn missing_cohorts() {
        let variant = Variant::default();

        assert_eq!(variant.total_counts(), (0, 0));
    }
}
