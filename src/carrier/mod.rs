//! Carrier frequency calculation for one gene.

pub mod data;
pub mod ds;
pub mod eval;
pub mod export;
pub mod report;

use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::common::{GnomadVersion, Settings};

use self::{
    data::{
        clinvar::{io as clinvar_io, Submissions},
        gnomad::Data as GeneData,
    },
    eval::{
        exclusion::{ExclusionReason, Exclusions},
        filter::{self, FilterConfig},
        result::{EffectiveFrequency, FrequencyChoice, LiteratureFrequency},
        risk::{ConsultandStatus, RecurrenceRisk},
        Evaluation, Evaluator,
    },
    export::ExportData,
};

/// Command line arguments for `carrier` command.
#[derive(Parser, Debug)]
#[command(about = "Carrier frequency calculation for one gene", long_about = None)]
pub struct Args {
    /// The gnomAD version the variants were fetched from.
    #[clap(long, value_enum, default_value_t = GnomadVersion::default())]
    pub gnomad_version: GnomadVersion,
    /// Path to the gnomAD gene variants GraphQL response (JSON).
    #[clap(long)]
    pub path_gene_variants: PathBuf,
    /// Path(s) to ClinVar submissions GraphQL responses (JSON).
    #[clap(long)]
    pub path_submissions: Vec<PathBuf>,
    /// Path to settings JSON file; defaults are used if not given.
    #[clap(long)]
    pub path_settings: Option<PathBuf>,

    /// Include high-confidence loss-of-function variants.
    #[clap(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub lof_hc: bool,
    /// Include missense-class variants with ClinVar evidence.
    #[clap(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub missense: bool,
    /// Use ClinVar pathogenic/likely pathogenic classifications.
    #[clap(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub clinvar: bool,
    /// Minimal ClinVar gold stars.
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub clinvar_stars: u8,
    /// Include conflicting classifications resolved by their submissions.
    #[clap(long)]
    pub include_conflicting: bool,
    /// Minimal percentage of pathogenic submissions for conflicting classifications.
    #[clap(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(50..=100))]
    pub conflicting_threshold: u8,

    /// Variants to exclude manually, as `VARIANT_ID` or `VARIANT_ID=REASON`.
    #[clap(long)]
    pub exclude: Vec<String>,
    /// Consultand status for the recurrence risk.
    #[clap(long, value_enum)]
    pub status: Option<ConsultandStatus>,
    /// Published carrier frequency to use for the recurrence risk instead of gnomAD.
    #[clap(long, requires = "literature_pmid", conflicts_with = "use_default_frequency")]
    pub literature_frequency: Option<f64>,
    /// PubMed identifier of the published carrier frequency.
    #[clap(long, requires = "literature_frequency")]
    pub literature_pmid: Option<String>,
    /// Use the configured default carrier frequency for the recurrence risk.
    #[clap(long)]
    pub use_default_frequency: bool,
    /// Render this text template (`{{name}}` placeholders) into the output.
    #[clap(long)]
    pub path_report_template: Option<PathBuf>,

    /// Write the population table as TSV to this path.
    #[clap(long)]
    pub path_populations_tsv: Option<PathBuf>,
    /// Write the submissions queries for conflicting variants to this path (JSONL).
    #[clap(long)]
    pub path_submissions_queries: Option<PathBuf>,
    /// Include the export records in the output.
    #[clap(long)]
    pub export: bool,
}

impl Args {
    /// The filter configuration from the arguments.
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            lof_hc_enabled: self.lof_hc,
            missense_enabled: self.missense,
            clinvar_enabled: self.clinvar,
            clinvar_star_threshold: self.clinvar_stars,
            include_conflicting: self.include_conflicting,
            conflicting_threshold: self.conflicting_threshold,
        }
    }

    /// The carrier frequency chosen for the recurrence risk.
    ///
    /// # Errors
    ///
    /// If the literature frequency is not in `(0, 1]` or its PMID is blank.
    pub fn frequency_choice(&self) -> Result<FrequencyChoice, anyhow::Error> {
        match (self.literature_frequency, &self.literature_pmid) {
            (Some(frequency), Some(pmid)) => Ok(FrequencyChoice::Literature(
                LiteratureFrequency::new(frequency, pmid)?,
            )),
            (None, None) if self.use_default_frequency => Ok(FrequencyChoice::Default),
            (None, None) => Ok(FrequencyChoice::Gnomad),
            _ => anyhow::bail!("literature frequency and PMID must be given together"),
        }
    }

    /// The manual exclusions from the arguments.
    ///
    /// # Errors
    ///
    /// If a reason cannot be parsed.
    pub fn exclusions(&self, gene_symbol: &str) -> Result<Exclusions, anyhow::Error> {
        let mut result = Exclusions::for_gene(gene_symbol);
        for value in &self.exclude {
            let (variant_id, reason) = match value.split_once('=') {
                Some((variant_id, reason)) => {
                    (variant_id, Some(reason.parse::<ExclusionReason>()?))
                }
                None => (value.as_str(), None),
            };
            result.exclude(variant_id, reason);
        }
        Ok(result)
    }
}

/// Output of the `carrier` command.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, serde::Serialize)]
pub struct Output {
    /// The evaluation result.
    pub evaluation: Evaluation,
    /// Carrier frequency chosen for the recurrence risk, if available.
    pub effective_frequency: Option<EffectiveFrequency>,
    /// Recurrence risk, if a consultand status was given.
    pub recurrence_risk: Option<RecurrenceRisk>,
    /// Rendered report, if a template was given.
    pub report: Option<String>,
    /// Export records, if requested.
    pub export: Option<ExportData>,
}

/// Write one submissions query per batch of conflicting variants.
fn write_submissions_queries(
    evaluator: &Evaluator,
    data: &GeneData,
    path: &Path,
) -> Result<(), anyhow::Error> {
    let variant_ids = filter::conflicting_variant_ids(data.clinvar_variants());
    let batches = clinvar_io::batches(&variant_ids, evaluator.settings().submissions_batch_size);
    tracing::info!(
        "writing {} submissions queries for {} conflicting variants",
        batches.len(),
        variant_ids.len()
    );

    let mut writer = std::fs::File::create(path)
        .map(std::io::BufWriter::new)
        .map_err(|e| anyhow::anyhow!("problem creating file: {}", e))?;
    for (idx, batch) in batches.iter().enumerate() {
        let request = clinvar_io::build_submissions_request(batch, evaluator.version_config());
        writeln!(writer, "{}", serde_json::to_string(&request)?)
            .map_err(|e| anyhow::anyhow!("problem writing query: {}", e))?;
        tracing::debug!(
            "  ... {}%",
            clinvar_io::progress(idx + 1, batches.len())
        );
    }
    writer
        .flush()
        .map_err(|e| anyhow::anyhow!("problem flushing queries: {}", e))?;

    Ok(())
}

/// Main entry point for the `carrier` command.
///
/// # Arguments
///
/// * `common_args` - Commonly used command line arguments.
/// * `args` - Command line arguments specific to `carrier` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `carrier`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let settings = match &args.path_settings {
        Some(path) => Settings::load(path)
            .map_err(|e| anyhow::anyhow!("failed to load settings: {}", e))?,
        None => Settings::default(),
    };
    let evaluator = Evaluator::new(args.gnomad_version, settings);

    let data = GeneData::load(&args.path_gene_variants)
        .map_err(|e| anyhow::anyhow!("failed to load gene variants: {}", e))?;
    let submissions = Submissions::load(&args.path_submissions)
        .map_err(|e| anyhow::anyhow!("failed to load submissions: {}", e))?;
    let exclusions = args.exclusions(data.symbol())?;
    let frequency_choice = args.frequency_choice()?;
    if let Some(path) = &args.path_submissions_queries {
        write_submissions_queries(&evaluator, &data, path)?;
    }

    let evaluation = evaluator.evaluate(&data, &args.filter_config(), &submissions, &exclusions);
    let effective_frequency =
        evaluator.effective_frequency(&evaluation.carrier_frequency, &frequency_choice);
    if effective_frequency.is_none() {
        tracing::warn!("no carrier frequency available for {}", data.symbol());
    }
    let recurrence_risk = args.status.and_then(|status| {
        effective_frequency
            .as_ref()
            .map(|effective| evaluator.recurrence_risk(effective, status))
    });

    let report_text = match (&args.path_report_template, &effective_frequency) {
        (Some(path), Some(effective)) => {
            let template = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("problem reading template: {}", e))?;
            let context = report::build_context(
                &evaluation,
                effective,
                args.status.unwrap_or_default(),
                evaluator.version_config(),
                evaluator.settings().frequency_decimal_places,
            );
            Some(report::render_template(&template, &context)?)
        }
        _ => None,
    };

    let export_data = (args.export || args.path_populations_tsv.is_some()).then(|| {
        ExportData::new(
            &evaluation,
            &data,
            evaluator.version_config(),
            &exclusions,
            effective_frequency.as_ref(),
            evaluator.settings().frequency_decimal_places,
        )
    });
    if let (Some(path), Some(export_data)) = (&args.path_populations_tsv, &export_data) {
        let file = std::fs::File::create(path)
            .map_err(|e| anyhow::anyhow!("problem creating file: {}", e))?;
        export::write_populations_tsv(file, &export_data.populations)?;
    }

    let output = Output {
        evaluation,
        effective_frequency,
        recurrence_risk,
        report: report_text,
        export: export_data.filter(|_| args.export),
    };
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}

#[cfg(test)]
mod test {
    use clap::Parser as _;

    use crate::carrier::eval::{
        exclusion::ExclusionReason,
        result::{FrequencyChoice, LiteratureFrequency},
    };

    /// Helper for parsing arguments in tests.
    #[derive(clap::Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        args: super::Args,
    }

    fn parse(args: &[&str]) -> Result<super::Args, clap::Error> {
        Cli::try_parse_from(
            ["carrier", "--path-gene-variants", "x.json"]
                .iter()
                .chain(args.iter()),
        )
        .map(|cli| cli.args)
    }

    #[test]
    fn args_defaults() -> Result<(), anyhow::Error> {
        let args = parse(&[])?;

        assert_eq!(
            args.filter_config(),
            crate::carrier::eval::filter::FilterConfig::default()
        );

        Ok(())
    }

    #[rstest::rstest]
    #[case(&["--clinvar-stars", "5"])]
    #[case(&["--conflicting-threshold", "49"])]
    #[case(&["--conflicting-threshold", "101"])]
    #[case(&["--literature-frequency", "0.02"])]
    #[case(&["--literature-pmid", "12345678"])]
    #[case(&["--literature-frequency", "0.02", "--literature-pmid", "1", "--use-default-frequency"])]
    fn args_invalid(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[test]
    fn args_filters_and_exclusions() -> Result<(), anyhow::Error> {
        let args = parse(&[
            "--lof-hc",
            "false",
            "--clinvar-stars",
            "0",
            "--include-conflicting",
            "--conflicting-threshold",
            "60",
            "--exclude",
            "1-1-A-G",
            "--exclude",
            "1-2-A-G=low_quality",
        ])?;

        let filters = args.filter_config();
        assert!(!filters.lof_hc_enabled);
        assert!(filters.missense_enabled);
        assert_eq!(filters.clinvar_star_threshold, 0);
        assert!(filters.include_conflicting);
        assert_eq!(filters.conflicting_threshold, 60);

        let exclusions = args.exclusions("DEMO1")?;
        assert_eq!(exclusions.len(), 2);
        assert_eq!(exclusions.reason("1-1-A-G"), None);
        assert_eq!(
            exclusions.reason("1-2-A-G"),
            Some(&ExclusionReason::LowQuality)
        );

        Ok(())
    }

    #[rstest::rstest]
    #[case(&[], Some(FrequencyChoice::Gnomad))]
    #[case(&["--use-default-frequency"], Some(FrequencyChoice::Default))]
    #[case(
        &["--literature-frequency", "0.02", "--literature-pmid", " 12345678 "],
        Some(FrequencyChoice::Literature(LiteratureFrequency {
            carrier_frequency: 0.02,
            pmid: "12345678".into(),
        }))
    )]
    #[case(&["--literature-frequency", "0", "--literature-pmid", "12345678"], None)]
    #[case(&["--literature-frequency", "1.5", "--literature-pmid", "12345678"], None)]
    #[case(&["--literature-frequency", "0.02", "--literature-pmid", " "], None)]
    fn args_frequency_choice(
        #[case] args: &[&str],
        #[case] expected: Option<FrequencyChoice>,
    ) -> Result<(), anyhow::Error> {
        let args = parse(args)?;

        assert_eq!(args.frequency_choice().ok(), expected);

        Ok(())
    }

    #[test]
    fn run_smoke() -> Result<(), anyhow::Error> {
        let common = crate::common::Args {
            verbose: clap_verbosity_flag::Verbosity::new(1, 0),
        };

        let args = parse(&[
            "--path-submissions",
            "tests/data/carrier/submissions.json",
            "--path-settings",
            "tests/data/carrier/settings.json",
            "--include-conflicting",
            "--exclude",
            "1-1006-G-T=population_specific",
            "--status",
            "compound-het-assumed",
            "--literature-frequency",
            "0.005",
            "--literature-pmid",
            "12345678",
            "--path-report-template",
            "tests/data/carrier/report_template.txt",
            "--export",
        ])
        .map(|args| super::Args {
            path_gene_variants: "tests/data/carrier/gene_variants.json".into(),
            ..args
        })?;

        super::run(&common, &args)
    }
}
