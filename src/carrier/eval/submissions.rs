//! Resolution of conflicting ClinVar classifications from individual submissions.

use crate::carrier::ds::ClinvarSubmission;

use super::vocabulary::SubmissionClass;

/// Percentage of pathogenic/likely pathogenic submissions.
///
/// Ambiguous submissions ("not provided", "risk factor", ...) are excluded from
/// numerator and denominator.
///
/// # Arguments
///
/// * `submissions` - The submissions of one variant.
///
/// # Returns
///
/// The percentage in `[0, 100]`, or `None` if there is no valid submission.
pub fn pathogenic_percentage(submissions: &[ClinvarSubmission]) -> Option<f64> {
    let (valid, pathogenic) = submissions
        .iter()
        .map(|submission| SubmissionClass::from_raw(&submission.clinical_significance))
        .filter(|class| *class != SubmissionClass::Ambiguous)
        .fold((0usize, 0usize), |(valid, pathogenic), class| {
            (
                valid + 1,
                pathogenic + usize::from(class == SubmissionClass::Pathogenic),
            )
        });

    if valid == 0 {
        None
    } else {
        Some(100.0 * pathogenic as f64 / valid as f64)
    }
}

/// Whether the pathogenic percentage of the submissions reaches `threshold` percent.
///
/// Returns `false` if the percentage cannot be computed.
pub fn meets_threshold(submissions: &[ClinvarSubmission], threshold: f64) -> bool {
    pathogenic_percentage(submissions).is_some_and(|percentage| percentage >= threshold)
}

#[cfg(test)]
mod test {
    use crate::carrier::ds::ClinvarSubmission;

    fn submissions(sigs: &[&str]) -> Vec<ClinvarSubmission> {
        sigs.iter().map(|sig| ClinvarSubmission::new(sig)).collect()
    }

    #[rstest::rstest]
    #[case(&[], None)]
    #[case(&["not provided"], None)]
    #[case(&["not provided", "risk factor", "other"], None)]
    #[case(&["Pathogenic", "Benign"], Some(50.0))]
    #[case(&["Pathogenic", "Likely pathogenic", "Uncertain significance", "not provided"], Some(200.0 / 3.0))]
    #[case(&["Likely pathogenic, low penetrance"], Some(100.0))]
    #[case(&["Benign", "Likely benign"], Some(0.0))]
    fn pathogenic_percentage(#[case] sigs: &[&str], #[case] expected: Option<f64>) {
        assert_eq!(super::pathogenic_percentage(&submissions(sigs)), expected);
    }

    #[rstest::rstest]
    #[case(&[], 50.0, false)]
    #[case(&["not provided"], 50.0, false)]
    #[case(&["Pathogenic", "Benign"], 50.0, true)]
    #[case(&["Pathogenic", "Benign"], 51.0, false)]
    #[case(&["Pathogenic", "Pathogenic", "Pathogenic", "Benign"], 75.0, true)]
    #[case(&["Pathogenic", "Pathogenic", "Pathogenic", "Benign"], 80.0, false)]
    fn meets_threshold(#[case] sigs: &[&str], #[case] threshold: f64, #[case] expected: bool) {
        assert_eq!(
            super::meets_threshold(&submissions(sigs), threshold),
            expected
        );
    }
}
