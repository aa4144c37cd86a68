//! Commonly used code.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod settings;

pub use settings::Settings;

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

/// Reference genome as used by the gnomAD API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    clap::ValueEnum,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
pub enum ReferenceGenome {
    /// GRCh37
    #[serde(rename = "GRCh37")]
    #[strum(serialize = "GRCh37")]
    Grch37,
    /// GRCh38
    #[serde(rename = "GRCh38")]
    #[strum(serialize = "GRCh38")]
    Grch38,
}

/// Endpoint of the public gnomAD GraphQL API.
pub const GNOMAD_API_ENDPOINT: &str = "https://gnomad.broadinstitute.org/api";

/// Supported gnomAD dataset versions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    clap::ValueEnum,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GnomadVersion {
    /// gnomAD v4 (GRCh38).
    #[default]
    V4,
    /// gnomAD v3 (GRCh38, genomes only).
    V3,
    /// gnomAD v2.1 (GRCh37).
    V2,
}

/// One population of a gnomAD dataset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct PopulationConfig {
    /// Population code as used in the API, e.g., `nfe`.
    pub code: String,
    /// Human-readable label.
    pub label: String,
}

impl PopulationConfig {
    fn new(code: &str, label: &str) -> Self {
        Self {
            code: code.to_string(),
            label: label.to_string(),
        }
    }
}

/// Version-specific gnomAD configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct VersionConfig {
    /// The version.
    pub version: GnomadVersion,
    /// Display name, e.g., "gnomAD v4".
    pub display_name: String,
    /// GraphQL endpoint.
    pub api_endpoint: String,
    /// Dataset identifier to pass to the API.
    pub dataset_id: String,
    /// Reference genome of the dataset.
    pub reference_genome: ReferenceGenome,
    /// The populations of the dataset, in display order.
    pub populations: Vec<PopulationConfig>,
}

impl VersionConfig {
    /// Population codes of the dataset.
    pub fn population_codes(&self) -> Vec<String> {
        self.populations.iter().map(|p| p.code.clone()).collect()
    }

    /// Label for the given population code, falling back to the code itself.
    pub fn population_label(&self, code: &str) -> String {
        self.populations
            .iter()
            .find(|p| p.code == code)
            .map(|p| p.label.clone())
            .unwrap_or_else(|| code.to_string())
    }
}

impl GnomadVersion {
    /// Return the configuration for this version.
    pub fn config(self) -> VersionConfig {
        match self {
            GnomadVersion::V4 => VersionConfig {
                version: self,
                display_name: "gnomAD v4".into(),
                api_endpoint: GNOMAD_API_ENDPOINT.into(),
                dataset_id: "gnomad_r4".into(),
                reference_genome: ReferenceGenome::Grch38,
                populations: vec![
                    PopulationConfig::new("afr", "African/African American"),
                    PopulationConfig::new("amr", "Admixed American"),
                    PopulationConfig::new("asj", "Ashkenazi Jewish"),
                    PopulationConfig::new("eas", "East Asian"),
                    PopulationConfig::new("fin", "Finnish"),
                    PopulationConfig::new("mid", "Middle Eastern"),
                    PopulationConfig::new("nfe", "European (non-Finnish)"),
                    PopulationConfig::new("sas", "South Asian"),
                    PopulationConfig::new("remaining", "Remaining"),
                ],
            },
            GnomadVersion::V3 => VersionConfig {
                version: self,
                display_name: "gnomAD v3".into(),
                api_endpoint: GNOMAD_API_ENDPOINT.into(),
                dataset_id: "gnomad_r3".into(),
                reference_genome: ReferenceGenome::Grch38,
                populations: vec![
                    PopulationConfig::new("afr", "African/African American"),
                    PopulationConfig::new("ami", "Amish"),
                    PopulationConfig::new("amr", "Latino/Admixed American"),
                    PopulationConfig::new("asj", "Ashkenazi Jewish"),
                    PopulationConfig::new("eas", "East Asian"),
                    PopulationConfig::new("fin", "Finnish"),
                    PopulationConfig::new("mid", "Middle Eastern"),
                    PopulationConfig::new("nfe", "European (non-Finnish)"),
                    PopulationConfig::new("sas", "South Asian"),
                    PopulationConfig::new("oth", "Other"),
                ],
            },
            GnomadVersion::V2 => VersionConfig {
                version: self,
                display_name: "gnomAD v2.1".into(),
                api_endpoint: GNOMAD_API_ENDPOINT.into(),
                dataset_id: "gnomad_r2_1".into(),
                reference_genome: ReferenceGenome::Grch37,
                populations: vec![
                    PopulationConfig::new("afr", "African/African American"),
                    PopulationConfig::new("amr", "Latino/Admixed American"),
                    PopulationConfig::new("asj", "Ashkenazi Jewish"),
                    PopulationConfig::new("eas", "East Asian"),
                    PopulationConfig::new("fin", "Finnish"),
                    PopulationConfig::new("nfe", "European (non-Finnish)"),
                    PopulationConfig::new("sas", "South Asian"),
                    PopulationConfig::new("oth", "Other"),
                ],
            },
        }
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator as _;

    use super::{GnomadVersion, ReferenceGenome};

    #[rstest::rstest]
    #[case(GnomadVersion::V4, "gnomad_r4", ReferenceGenome::Grch38, 9)]
    #[case(GnomadVersion::V3, "gnomad_r3", ReferenceGenome::Grch38, 10)]
    #[case(GnomadVersion::V2, "gnomad_r2_1", ReferenceGenome::Grch37, 8)]
    fn version_config(
        #[case] version: GnomadVersion,
        #[case] dataset_id: &str,
        #[case] reference_genome: ReferenceGenome,
        #[case] n_populations: usize,
    ) {
        let config = version.config();

        assert_eq!(config.version, version);
        assert_eq!(config.dataset_id, dataset_id);
        assert_eq!(config.reference_genome, reference_genome);
        assert_eq!(config.populations.len(), n_populations);
    }

    #[test]
    fn population_label_falls_back_to_code() {
        let config = GnomadVersion::V4.config();

        assert_eq!(config.population_label("asj"), "Ashkenazi Jewish");
        assert_eq!(config.population_label("xyz"), "xyz");
    }

    #[test]
    fn versions_and_names() {
        let names = GnomadVersion::iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["v4", "v3", "v2"]);
        assert_eq!(ReferenceGenome::Grch37.to_string(), "GRCh37");
    }
}
