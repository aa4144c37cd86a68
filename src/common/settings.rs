//! Application settings, i.e., the calculation thresholds.

use std::{io::BufReader, path::Path};

/// Thresholds and defaults used by the carrier frequency calculation.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Settings {
    /// A population is flagged for founder effect when its carrier frequency exceeds
    /// the global one times this multiplier.
    pub founder_effect_multiplier: f64,
    /// Populations with fewer sequenced alleles than this are flagged as low sample size.
    pub low_sample_size_threshold: u64,
    /// Carrier frequency to fall back to when no variant qualifies.
    pub default_carrier_frequency: f64,
    /// Decimal places for percentage display.
    pub frequency_decimal_places: usize,
    /// Number of variants per ClinVar submissions request.
    pub submissions_batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            founder_effect_multiplier: 5.0,
            low_sample_size_threshold: 1_000,
            default_carrier_frequency: 0.01,
            frequency_decimal_places: 2,
            submissions_batch_size: 50,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    ///
    /// Missing keys are filled from the defaults.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let reader = std::fs::File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("problem opening settings file: {}", e))
            .map(BufReader::new)?;
        let settings: Settings = serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("problem parsing settings: {}", e))?;
        if settings.submissions_batch_size == 0 {
            anyhow::bail!("submissions_batch_size must be positive");
        }
        tracing::debug!("loaded settings {:?}", &settings);

        Ok(settings)
    }
}

#[cfg(test)]
mod test {
    use super::Settings;

    #[test]
    fn load_partial() -> Result<(), anyhow::Error> {
        let settings = Settings::load("tests/data/carrier/settings.json")?;

        assert_eq!(settings.founder_effect_multiplier, 10.0);
        assert_eq!(settings.low_sample_size_threshold, 1_000);
        assert_eq!(settings.default_carrier_frequency, 0.01);

        Ok(())
    }

    #[test]
    fn load_missing() {
        assert!(Settings::load("tests/data/carrier/does-not-exist.json").is_err());
    }
}
