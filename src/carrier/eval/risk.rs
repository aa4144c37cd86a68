//! Recurrence risk for the offspring of a consultand.

/// Genotype status of the index patient or consultand.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    clap::ValueEnum,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConsultandStatus {
    /// Heterozygous carrier.
    #[default]
    Heterozygous,
    /// Affected, homozygous.
    Homozygous,
    /// Affected, compound heterozygous with confirmed phase.
    CompoundHetConfirmed,
    /// Affected, compound heterozygous with assumed phase.
    CompoundHetAssumed,
}

impl ConsultandStatus {
    /// Divisor applied to the partner's carrier frequency.
    ///
    /// A heterozygous consultand transmits the allele with probability 1/2, as does a
    /// carrier partner, giving 1/4.  An affected consultand always transmits it.
    fn divisor(self) -> f64 {
        match self {
            ConsultandStatus::Heterozygous => 4.0,
            ConsultandStatus::Homozygous
            | ConsultandStatus::CompoundHetConfirmed
            | ConsultandStatus::CompoundHetAssumed => 2.0,
        }
    }
}

/// Recurrence risk given the carrier frequency of the partner's population.
pub fn recurrence_risk(carrier_frequency: f64, status: ConsultandStatus) -> f64 {
    carrier_frequency / status.divisor()
}

/// Format a risk as "1:N" with `N = round(1 / risk)`, "N/A" if the risk is not positive.
pub fn risk_to_ratio(risk: f64) -> String {
    if risk > 0.0 {
        format!("1:{}", (1.0 / risk).round() as u64)
    } else {
        "N/A".to_string()
    }
}

/// Extra digits inspected when looking for an exact tie.
const TIE_DIGITS: usize = 25;

/// Format `value` with a fixed number of decimal places, rounding exact ties away
/// from zero.
///
/// `format!` rounds ties to even, so `0.125` would become "0.12".  A tie is
/// detected on the exact decimal expansion of `value` and nudged by a quarter of
/// the last place before formatting.
pub fn format_fixed(value: f64, decimal_places: usize) -> String {
    if !value.is_finite() {
        return format!("{:.*}", decimal_places, value);
    }
    let digits = format!("{:.*}", decimal_places + TIE_DIGITS, value.abs());
    let tail = &digits[digits.len() - TIE_DIGITS..];
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if is_tie {
        let quarter = 0.25 * 10f64.powi(-(decimal_places as i32));
        format!("{:.*}", decimal_places, value + value.signum() * quarter)
    } else {
        format!("{:.*}", decimal_places, value)
    }
}

/// Format a risk as percentage with the given number of decimal places, e.g., "1.00%".
pub fn risk_to_percent(risk: f64, decimal_places: usize) -> String {
    format!("{}%", format_fixed(risk * 100.0, decimal_places))
}

/// Recurrence risk with its display strings.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RecurrenceRisk {
    /// The carrier frequency the risk is based on.
    pub carrier_frequency: f64,
    /// Status of the consultand.
    pub status: ConsultandStatus,
    /// The risk as a fraction.
    pub risk: f64,
    /// The risk as percentage string.
    pub percent: String,
    /// The risk as "1:N" string.
    pub ratio: String,
}

impl RecurrenceRisk {
    /// Compute the risk and its display strings.
    pub fn new(carrier_frequency: f64, status: ConsultandStatus, decimal_places: usize) -> Self {
        let risk = recurrence_risk(carrier_frequency, status);
        Self {
            carrier_frequency,
            status,
            risk,
            percent: risk_to_percent(risk, decimal_places),
            ratio: risk_to_ratio(risk),
        }
    }
}
