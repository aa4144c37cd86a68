//! Recurrence risk from a known carrier frequency.

use clap::Parser;

use crate::{
    carrier::eval::risk::{ConsultandStatus, RecurrenceRisk},
    common::Settings,
};

/// Parse a carrier frequency in `[0, 1]`.
fn parse_frequency(value: &str) -> Result<f64, String> {
    let frequency: f64 = value
        .parse()
        .map_err(|e| format!("invalid frequency {}: {}", value, e))?;
    if (0.0..=1.0).contains(&frequency) {
        Ok(frequency)
    } else {
        Err(format!("frequency must be in [0, 1], got {}", frequency))
    }
}

/// Command line arguments for `risk` command.
#[derive(Parser, Debug)]
#[command(about = "Recurrence risk from a carrier frequency", long_about = None)]
pub struct Args {
    /// Carrier frequency of the partner's population.
    #[clap(long, value_parser = parse_frequency)]
    pub carrier_frequency: f64,
    /// Status of the consultand.
    #[clap(long, value_enum, default_value_t = ConsultandStatus::default())]
    pub status: ConsultandStatus,
    /// Decimal places of the percentage.
    #[clap(long, default_value_t = Settings::default().frequency_decimal_places)]
    pub decimal_places: usize,
}

/// Main entry point for the `risk` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `risk`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let result = RecurrenceRisk::new(args.carrier_frequency, args.status, args.decimal_places);
    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}

#[cfg(test)]
mod test {
    #[rstest::rstest]
    #[case("0.04", Some(0.04))]
    #[case("0", Some(0.0))]
    #[case("1.5", None)]
    #[case("-0.1", None)]
    #[case("abc", None)]
    fn parse_frequency(#[case] value: &str, #[case] expected: Option<f64>) {
        assert_eq!(super::parse_frequency(value).ok(), expected);
    }

    #[test]
    fn run_smoke() -> Result<(), anyhow::Error> {
        let common = crate::common::Args {
            verbose: clap_verbosity_flag::Verbosity::new(1, 0),
        };
        let args = super::Args {
            carrier_frequency: 0.04,
            status: crate::carrier::eval::risk::ConsultandStatus::Homozygous,
            decimal_places: 2,
        };

        super::run(&common, &args)
    }
}
