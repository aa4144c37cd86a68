//! Aggregation of allele counts into carrier frequencies.
//!
//! Each variant's allele frequency is computed from its own allele number and the
//! frequencies are summed afterwards.  The allele number differs between variants
//! because of coverage, so neither the counts nor the allele numbers are summed
//! across variants for the frequency.

use std::cmp::Ordering;

use itertools::Itertools as _;

use crate::{
    carrier::ds::{Cohort, Variant},
    common::{Settings, VersionConfig},
};

use super::result::{CarrierFrequency, FrequencySource, PopulationFrequency};

/// Running totals over the qualifying variants of one population.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlleleTally {
    /// Sum of the per-variant allele frequencies.
    pub sum_af: f64,
    /// Sum of the allele counts, for display.
    pub total_ac: u64,
    /// Largest exome allele number seen.
    pub max_exome_an: u64,
    /// Largest genome allele number seen.
    pub max_genome_an: u64,
}

impl AlleleTally {
    /// Add one variant given as `(ac, an)` of the exome and genome cohort.
    ///
    /// A variant with zero combined allele number contributes nothing to the frequency.
    pub fn add(&mut self, exome: (u64, u64), genome: (u64, u64)) {
        let ac = exome.0 + genome.0;
        let an = exome.1 + genome.1;
        if an > 0 {
            self.sum_af += ac as f64 / an as f64;
        }
        self.total_ac += ac;
        self.max_exome_an = self.max_exome_an.max(exome.1);
        self.max_genome_an = self.max_genome_an.max(genome.1);
    }

    /// Representative allele number, i.e., largest exome plus largest genome AN.
    pub fn allele_number(&self) -> u64 {
        self.max_exome_an + self.max_genome_an
    }

    /// Carrier frequency `2 * sum(AF)`, `None` if no pathogenic allele was seen.
    pub fn carrier_frequency(&self) -> Option<f64> {
        (self.sum_af > 0.0).then(|| 2.0 * self.sum_af)
    }
}

/// Aggregated tally of one population.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationAggregate {
    /// Population code.
    pub code: String,
    /// The tally.
    pub tally: AlleleTally,
}

fn population_counts(cohort: Option<&Cohort>, code: &str) -> (u64, u64) {
    cohort
        .and_then(|cohort| cohort.population(code))
        .map(|p| (p.ac, p.an))
        .unwrap_or_default()
}

fn total_counts(cohort: Option<&Cohort>) -> (u64, u64) {
    cohort.map(|c| (c.ac, c.an)).unwrap_or_default()
}

/// Aggregate the qualifying variants per population.
///
/// # Arguments
///
/// * `variants` - The qualifying variants.
/// * `codes` - The population codes of the dataset, in display order.
///
/// # Returns
///
/// One aggregate per code, in the order of `codes`.
pub fn aggregate(variants: &[&Variant], codes: &[String]) -> Vec<PopulationAggregate> {
    codes
        .iter()
        .map(|code| {
            let mut tally = AlleleTally::default();
            for variant in variants {
                tally.add(
                    population_counts(variant.exome.as_ref(), code),
                    population_counts(variant.genome.as_ref(), code),
                );
            }
            PopulationAggregate {
                code: code.clone(),
                tally,
            }
        })
        .collect()
}

/// Aggregate the qualifying variants over all populations, using the cohort totals.
pub fn aggregate_global(variants: &[&Variant]) -> AlleleTally {
    let mut tally = AlleleTally::default();
    for variant in variants {
        tally.add(
            total_counts(variant.exome.as_ref()),
            total_counts(variant.genome.as_ref()),
        );
    }
    tally
}

/// Build the per-population results from the aggregates.
///
/// # Arguments
///
/// * `aggregates` - The per-population aggregates.
/// * `global_carrier_frequency` - Global carrier frequency to compare against.
/// * `version_config` - Dataset configuration, for the population labels.
/// * `founder_effect_multiplier` - Multiple of the global frequency that flags a founder effect.
/// * `low_sample_size_threshold` - Allele numbers below this are flagged.
///
/// # Returns
///
/// The results sorted descending by carrier frequency.  Populations without
/// frequency come last and keep their relative order.
pub fn build_population_results(
    aggregates: &[PopulationAggregate],
    global_carrier_frequency: Option<f64>,
    version_config: &VersionConfig,
    founder_effect_multiplier: f64,
    low_sample_size_threshold: u64,
) -> Vec<PopulationFrequency> {
    let mut result = aggregates
        .iter()
        .map(|aggregate| {
            let carrier_frequency = aggregate.tally.carrier_frequency();
            let allele_number = aggregate.tally.allele_number();
            let is_founder_effect = match (carrier_frequency, global_carrier_frequency) {
                (Some(freq), Some(global)) => freq > global * founder_effect_multiplier,
                _ => false,
            };
            PopulationFrequency {
                code: aggregate.code.clone(),
                label: version_config.population_label(&aggregate.code),
                carrier_frequency,
                allele_count: aggregate.tally.total_ac,
                allele_number,
                is_low_sample_size: allele_number < low_sample_size_threshold,
                is_founder_effect,
            }
        })
        .collect::<Vec<_>>();

    result.sort_by(|a, b| match (a.carrier_frequency, b.carrier_frequency) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    result
}

/// Compute the gene-level carrier frequency summary.
///
/// Without qualifying variants, the global frequency is the configured default.
pub fn summarize(
    variants: &[&Variant],
    version_config: &VersionConfig,
    settings: &Settings,
) -> CarrierFrequency {
    let global = aggregate_global(variants);
    let (global_carrier_frequency, source) = if variants.is_empty() {
        (
            Some(settings.default_carrier_frequency),
            FrequencySource::Default,
        )
    } else {
        (global.carrier_frequency(), FrequencySource::Computed)
    };

    let populations = build_population_results(
        &aggregate(variants, &version_config.population_codes()),
        global_carrier_frequency,
        version_config,
        settings.founder_effect_multiplier,
        settings.low_sample_size_threshold,
    );
    let (min_frequency, max_frequency) = populations
        .iter()
        .filter_map(|p| p.carrier_frequency)
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
        .map(|(min, max)| (Some(min), Some(max)))
        .unwrap_or_default();

    CarrierFrequency {
        global_carrier_frequency,
        source,
        global_allele_count: global.total_ac,
        global_allele_number: global.allele_number(),
        qualifying_variant_count: variants.len(),
        min_frequency,
        max_frequency,
        has_founder_effect: populations.iter().any(|p| p.is_founder_effect),
        populations,
    }
}

#[cfg(test)]
mod test {
    use crate::{
        carrier::{
            ds::{Cohort, PopulationCounts, Variant},
            eval::result::FrequencySource,
        },
        common::{GnomadVersion, Settings},
    };

    use super::{AlleleTally, PopulationAggregate};

    fn cohort(populations: &[(&str, u64, u64)]) -> Cohort {
        Cohort {
            ac: populations.iter().map(|p| p.1).sum(),
            an: populations.iter().map(|p| p.2).sum(),
            populations: populations
                .iter()
                .map(|(id, ac, an)| PopulationCounts {
                    id: id.to_string(),
                    ac: *ac,
                    an: *an,
                })
                .collect(),
        }
    }

    fn variant(exome: Option<Cohort>, genome: Option<Cohort>) -> Variant {
        Variant {
            variant_id: "1-1000-A-G".into(),
            exome,
            genome,
            ..Default::default()
        }
    }

    fn codes(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn single_variant_one_cohort() {
        let v = variant(
            Some(cohort(&[("nfe", 10, 1_000), ("afr", 0, 50_000)])),
            Some(cohort(&[("nfe", 0, 0)])),
        );

        let res = super::aggregate(&[&v], &codes(&["nfe", "afr"]));

        assert_eq!(res[0].tally.carrier_frequency(), Some(0.02));
        assert_eq!(res[0].tally.allele_number(), 1_000);
        assert_eq!(res[1].tally.carrier_frequency(), None);
        assert_eq!(res[1].tally.allele_number(), 50_000);
    }

    #[test]
    fn varying_allele_numbers() {
        let v1 = variant(Some(cohort(&[("nfe", 5, 100)])), None);
        let v2 = variant(Some(cohort(&[("nfe", 5, 50)])), None);

        let res = super::aggregate(&[&v1, &v2], &codes(&["nfe"]));

        let freq = res[0].tally.carrier_frequency().unwrap_or_default();
        assert!((freq - 0.3).abs() < 1e-12, "{}", freq);
        assert_eq!(res[0].tally.total_ac, 10);
        assert_eq!(res[0].tally.allele_number(), 100);
    }

    #[test]
    fn combined_cohorts() {
        let v1 = variant(
            Some(cohort(&[("nfe", 3, 400)])),
            Some(cohort(&[("nfe", 1, 100)])),
        );
        let v2 = variant(None, Some(cohort(&[("nfe", 1, 200)])));

        let res = super::aggregate(&[&v1, &v2], &codes(&["nfe"]));

        // 4/500 + 1/200
        let freq = res[0].tally.carrier_frequency().unwrap_or_default();
        assert!((freq - 0.026).abs() < 1e-12, "{}", freq);
        assert_eq!(res[0].tally.total_ac, 5);
        assert_eq!(res[0].tally.allele_number(), 600);
    }

    #[test]
    fn zero_allele_number_contributes_nothing() {
        let mut tally = AlleleTally::default();
        tally.add((0, 0), (0, 0));
        tally.add((2, 0), (0, 0));

        assert_eq!(tally.sum_af, 0.0);
        assert_eq!(tally.carrier_frequency(), None);
        assert_eq!(tally.total_ac, 2);
    }

    fn aggregate(code: &str, sum_af: f64, an: u64) -> PopulationAggregate {
        PopulationAggregate {
            code: code.into(),
            tally: AlleleTally {
                sum_af,
                max_exome_an: an,
                ..Default::default()
            },
        }
    }

    #[rstest::rstest]
    #[case(0.15, true)]
    #[case(0.075, false)]
    fn founder_effect(#[case] sum_af: f64, #[case] expected: bool) {
        let config = GnomadVersion::V4.config();

        let res = super::build_population_results(
            &[aggregate("asj", sum_af, 10_000)],
            Some(0.04),
            &config,
            5.0,
            1_000,
        );

        assert_eq!(res[0].is_founder_effect, expected);
        assert_eq!(res[0].label, "Ashkenazi Jewish");
    }

    #[test]
    fn no_founder_effect_without_global() {
        let config = GnomadVersion::V4.config();

        let res = super::build_population_results(
            &[aggregate("asj", 0.15, 10_000)],
            None,
            &config,
            5.0,
            1_000,
        );

        assert!(!res[0].is_founder_effect);
    }

    #[test]
    fn sort_and_flags() {
        let config = GnomadVersion::V4.config();

        let res = super::build_population_results(
            &[
                aggregate("afr", 0.0, 100),
                aggregate("amr", 0.01, 5_000),
                aggregate("asj", 0.0, 5_000),
                aggregate("eas", 0.02, 999),
                aggregate("xyz", 0.005, 1_000),
            ],
            Some(0.01),
            &config,
            5.0,
            1_000,
        );

        insta::assert_yaml_snapshot!(res, @r###"
        - code: eas
          label: East Asian
          carrier_frequency: 0.04
          allele_count: 0
          allele_number: 999
          is_low_sample_size: true
          is_founder_effect: false
        - code: amr
          label: Admixed American
          carrier_frequency: 0.02
          allele_count: 0
          allele_number: 5000
          is_low_sample_size: false
          is_founder_effect: false
        - code: xyz
          label: xyz
          carrier_frequency: 0.01
          allele_count: 0
          allele_number: 1000
          is_low_sample_size: false
          is_founder_effect: false
        - code: afr
          label: African/African American
          carrier_frequency: ~
          allele_count: 0
          allele_number: 100
          is_low_sample_size: true
          is_founder_effect: false
        - code: asj
          label: Ashkenazi Jewish
          carrier_frequency: ~
          allele_count: 0
          allele_number: 5000
          is_low_sample_size: false
          is_founder_effect: false
        "###);
    }

    #[test]
    fn summarize_empty() {
        let config = GnomadVersion::V4.config();
        let settings = Settings::default();

        let res = super::summarize(&[], &config, &settings);

        assert_eq!(res.source, FrequencySource::Default);
        assert!(res.using_default());
        assert_eq!(res.global_carrier_frequency, Some(0.01));
        assert_eq!(res.global_allele_count, 0);
        assert_eq!(res.global_allele_number, 0);
        assert_eq!(res.qualifying_variant_count, 0);
        assert_eq!(res.min_frequency, None);
        assert_eq!(res.max_frequency, None);
        assert!(!res.has_founder_effect);
        assert_eq!(res.populations.len(), 9);
        assert!(res.populations.iter().all(|p| p.carrier_frequency.is_none()));
    }

    #[test]
    fn summarize_computed() {
        let config = GnomadVersion::V4.config();
        let settings = Settings::default();
        let v1 = variant(
            Some(cohort(&[("nfe", 10, 1_000), ("asj", 0, 1_000)])),
            None,
        );
        let v2 = variant(
            Some(cohort(&[("nfe", 0, 1_000), ("asj", 20, 1_000)])),
            None,
        );

        let res = super::summarize(&[&v1, &v2], &config, &settings);

        assert_eq!(res.source, FrequencySource::Computed);
        assert_eq!(res.qualifying_variant_count, 2);
        assert_eq!(res.global_allele_count, 30);
        assert_eq!(res.global_allele_number, 2_000);
        // 2 * (10/2000 + 20/2000)
        let global = res.global_carrier_frequency.unwrap_or_default();
        assert!((global - 0.03).abs() < 1e-12, "{}", global);
        assert_eq!(res.populations[0].code, "asj");
        assert_eq!(res.populations[0].carrier_frequency, Some(0.04));
        assert_eq!(res.populations[1].code, "nfe");
        assert_eq!(res.populations[1].carrier_frequency, Some(0.02));
        assert_eq!(res.min_frequency, Some(0.02));
        assert_eq!(res.max_frequency, Some(0.04));
        assert!(!res.has_founder_effect);
    }
}
