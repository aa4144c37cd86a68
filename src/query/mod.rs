//! GraphQL request for the variants of a gene.

use std::{io::Write as _, path::PathBuf};

use clap::Parser;

use crate::{carrier::data::gnomad::io::build_gene_variants_request, common::GnomadVersion};

/// Command line arguments for `query` command.
#[derive(Parser, Debug)]
#[command(about = "GraphQL request for the variants of a gene", long_about = None)]
pub struct Args {
    /// The gnomAD version to query.
    #[clap(long, value_enum, default_value_t = GnomadVersion::default())]
    pub gnomad_version: GnomadVersion,
    /// Gene symbol, e.g., "CFTR".
    #[clap(long)]
    pub gene: String,
    /// Write the request to this path instead of stdout.
    #[clap(long)]
    pub path_output: Option<PathBuf>,
}

/// Main entry point for the `query` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `query`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let gene = args.gene.trim();
    if gene.is_empty() {
        anyhow::bail!("gene symbol must not be empty");
    }
    let request = build_gene_variants_request(&gene.to_uppercase(), &args.gnomad_version.config());
    let json = serde_json::to_string(&request)?;

    match &args.path_output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .map_err(|e| anyhow::anyhow!("problem creating file: {}", e))?;
            writeln!(file, "{}", json)
                .map_err(|e| anyhow::anyhow!("problem writing request: {}", e))?;
            tracing::info!("wrote request for {} to {}", gene, path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::common::GnomadVersion;

    fn common() -> crate::common::Args {
        crate::common::Args {
            verbose: clap_verbosity_flag::Verbosity::new(1, 0),
        }
    }

    #[test]
    fn run_smoke() -> Result<(), anyhow::Error> {
        let args = super::Args {
            gnomad_version: GnomadVersion::V3,
            gene: "cftr".into(),
            path_output: None,
        };

        super::run(&common(), &args)
    }

    #[test]
    fn run_empty_gene() {
        let args = super::Args {
            gnomad_version: GnomadVersion::V4,
            gene: "  ".into(),
            path_output: None,
        };

        assert!(super::run(&common(), &args).is_err());
    }
}
