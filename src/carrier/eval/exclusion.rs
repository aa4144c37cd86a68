//! Manual exclusion of variants by the user.

use std::collections::BTreeMap;

/// Reason for excluding a variant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "text")]
pub enum ExclusionReason {
    /// Variant appears benign based on clinical evidence.
    LikelyBenign,
    /// Sequencing quality concerns.
    LowQuality,
    /// Frequency specific to certain populations.
    PopulationSpecific,
    /// Any other reason, with optional free text.
    Other(Option<String>),
}

impl ExclusionReason {
    /// Display label, e.g., "Other: reported in-house as benign".
    pub fn label(&self) -> String {
        match self {
            ExclusionReason::LikelyBenign => "Likely benign".to_string(),
            ExclusionReason::LowQuality => "Low quality".to_string(),
            ExclusionReason::PopulationSpecific => "Population-specific".to_string(),
            ExclusionReason::Other(Some(text)) if !text.is_empty() => format!("Other: {}", text),
            ExclusionReason::Other(_) => "Other".to_string(),
        }
    }
}

impl std::str::FromStr for ExclusionReason {
    type Err = anyhow::Error;

    /// Parse `likely_benign`, `low_quality`, `population_specific`, `other`, or
    /// `other:<text>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("other", text)) => Ok(ExclusionReason::Other(Some(text.trim().to_string()))),
            Some(_) => anyhow::bail!("invalid exclusion reason: {}", s),
            None => match s {
                "likely_benign" => Ok(ExclusionReason::LikelyBenign),
                "low_quality" => Ok(ExclusionReason::LowQuality),
                "population_specific" => Ok(ExclusionReason::PopulationSpecific),
                "other" => Ok(ExclusionReason::Other(None)),
                _ => anyhow::bail!("invalid exclusion reason: {}", s),
            },
        }
    }
}

/// Variants excluded by the user for one gene, with optional reasons.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Exclusions {
    /// Gene the exclusions apply to.
    gene_symbol: Option<String>,
    /// Excluded variant identifiers with their reasons.
    reasons: BTreeMap<String, Option<ExclusionReason>>,
}

impl Exclusions {
    /// Create empty exclusions for the given gene.
    pub fn for_gene(gene_symbol: &str) -> Self {
        Self {
            gene_symbol: Some(gene_symbol.to_string()),
            ..Default::default()
        }
    }

    /// The gene the exclusions apply to.
    pub fn gene_symbol(&self) -> Option<&str> {
        self.gene_symbol.as_deref()
    }

    /// Exclude a variant.  An existing reason is kept if `reason` is `None`.
    pub fn exclude(&mut self, variant_id: &str, reason: Option<ExclusionReason>) {
        let entry = self.reasons.entry(variant_id.to_string()).or_default();
        if reason.is_some() {
            *entry = reason;
        }
    }

    /// Remove the exclusion of a variant.
    pub fn include(&mut self, variant_id: &str) {
        self.reasons.remove(variant_id);
    }

    /// Toggle the exclusion of a variant.
    pub fn toggle(&mut self, variant_id: &str, reason: Option<ExclusionReason>) {
        if self.is_excluded(variant_id) {
            self.include(variant_id);
        } else {
            self.exclude(variant_id, reason);
        }
    }

    /// Remove all exclusions.
    pub fn include_all(&mut self) {
        self.reasons.clear();
    }

    /// Set the reason of an already excluded variant; no-op otherwise.
    pub fn set_reason(&mut self, variant_id: &str, reason: ExclusionReason) {
        if let Some(entry) = self.reasons.get_mut(variant_id) {
            *entry = Some(reason);
        }
    }

    /// Whether the variant is excluded.
    pub fn is_excluded(&self, variant_id: &str) -> bool {
        self.reasons.contains_key(variant_id)
    }

    /// The reason for excluding the variant, if any was given.
    pub fn reason(&self, variant_id: &str) -> Option<&ExclusionReason> {
        self.reasons.get(variant_id).and_then(Option::as_ref)
    }

    /// Identifiers of the excluded variants, sorted.
    pub fn variant_ids(&self) -> impl Iterator<Item = &str> {
        self.reasons.keys().map(String::as_str)
    }

    /// Number of excluded variants.
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    /// Whether no variant is excluded.
    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Clear the exclusions if they belong to a different gene.
    pub fn reset_for_gene(&mut self, gene_symbol: &str) {
        if self.gene_symbol.as_deref() != Some(gene_symbol) {
            tracing::debug!("resetting exclusions for gene {}", gene_symbol);
            self.reasons.clear();
            self.gene_symbol = Some(gene_symbol.to_string());
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ExclusionReason, Exclusions};

    #[rstest::rstest]
    #[case("likely_benign", ExclusionReason::LikelyBenign, "Likely benign")]
    #[case("low_quality", ExclusionReason::LowQuality, "Low quality")]
    #[case(
        "population_specific",
        ExclusionReason::PopulationSpecific,
        "Population-specific"
    )]
    #[case("other", ExclusionReason::Other(None), "Other")]
    #[case(
        "other: in-house benign",
        ExclusionReason::Other(Some("in-house benign".into())),
        "Other: in-house benign"
    )]
    fn reason_from_str(
        #[case] raw: &str,
        #[case] expected: ExclusionReason,
        #[case] label: &str,
    ) -> Result<(), anyhow::Error> {
        let reason: ExclusionReason = raw.parse()?;

        assert_eq!(reason, expected);
        assert_eq!(reason.label(), label);

        Ok(())
    }

    #[rstest::rstest]
    #[case("benign")]
    #[case("low_quality:bad")]
    fn reason_from_str_invalid(#[case] raw: &str) {
        assert!(raw.parse::<ExclusionReason>().is_err());
    }

    #[test]
    fn exclude_toggle_include() {
        let mut exclusions = Exclusions::for_gene("CFTR");

        exclusions.exclude("1-1-A-G", Some(ExclusionReason::LowQuality));
        exclusions.exclude("1-1-A-G", None);
        exclusions.toggle("1-2-A-G", None);
        assert_eq!(exclusions.len(), 2);
        assert_eq!(
            exclusions.reason("1-1-A-G"),
            Some(&ExclusionReason::LowQuality)
        );
        assert!(exclusions.is_excluded("1-2-A-G"));
        assert_eq!(exclusions.reason("1-2-A-G"), None);

        exclusions.set_reason("1-2-A-G", ExclusionReason::LikelyBenign);
        exclusions.set_reason("1-3-A-G", ExclusionReason::LikelyBenign);
        assert_eq!(
            exclusions.reason("1-2-A-G"),
            Some(&ExclusionReason::LikelyBenign)
        );
        assert!(!exclusions.is_excluded("1-3-A-G"));

        exclusions.toggle("1-2-A-G", None);
        exclusions.include("1-1-A-G");
        assert!(exclusions.is_empty());
    }

    #[test]
    fn reset_for_gene() {
        let mut exclusions = Exclusions::for_gene("CFTR");
        exclusions.exclude("1-1-A-G", None);

        exclusions.reset_for_gene("CFTR");
        assert_eq!(exclusions.len(), 1);

        exclusions.reset_for_gene("HBB");
        assert!(exclusions.is_empty());
        assert_eq!(exclusions.gene_symbol(), Some("HBB"));
    }

    #[test]
    fn serialize() {
        let mut exclusions = Exclusions::for_gene("CFTR");
        exclusions.exclude("1-1-A-G", Some(ExclusionReason::Other(Some("x".into()))));
        exclusions.exclude("1-2-A-G", Some(ExclusionReason::LowQuality));

        insta::assert_yaml_snapshot!(exclusions, @r###"
        gene_symbol: CFTR
        reasons:
          1-1-A-G:
            type: other
            text: x
          1-2-A-G:
            type: low_quality
        "###);
    }
}
