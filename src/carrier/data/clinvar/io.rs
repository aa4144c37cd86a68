//! I/O code for ClinVar submission queries.
//!
//! Submissions are fetched per variant with aliased `clinvar_variant` queries so that
//! many variants can be resolved with one request.  The HTTP transport is left to
//! the caller; this module only builds the queries and parses the responses.

use std::path::Path;

use crate::{
    carrier::{
        data::{GraphqlRequest, GraphqlResponse},
        ds::ClinvarSubmission,
    },
    common::{ReferenceGenome, VersionConfig},
};

/// One entry of the submissions response.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VariantSubmissions {
    /// Identifier of the form `CHROM-POS-REF-ALT`.
    pub variant_id: String,
    /// The submissions, `null` if none are known.
    #[serde(default)]
    pub submissions: Option<Vec<ClinvarSubmission>>,
}

/// The `data` payload of a submissions response.
///
/// Maps query alias (`v0`, `v1`, ...) to entry, `None` for variants unknown to ClinVar.
pub type SubmissionsData = std::collections::BTreeMap<String, Option<VariantSubmissions>>;

/// Split variant identifiers into batches of at most `batch_size`.
///
/// # Panics
///
/// If `batch_size` is zero.
pub fn batches(variant_ids: &[String], batch_size: usize) -> Vec<&[String]> {
    variant_ids.chunks(batch_size).collect()
}

/// Progress in percent after `done` of `total` batches.
pub fn progress(done: usize, total: usize) -> u8 {
    if total == 0 {
        100
    } else {
        ((done as f64 / total as f64) * 100.0).round() as u8
    }
}

/// Build an aliased GraphQL query for the submissions of the given variants.
///
/// Variant identifiers contain dashes which are not valid in aliases, so the
/// aliases are built from the index (`v0`, `v1`, ...).
///
/// # Arguments
///
/// * `variant_ids` - Variant identifiers to query for.
/// * `reference_genome` - Reference genome of the identifiers.
///
/// # Returns
///
/// The GraphQL query string.
pub fn build_submissions_query(variant_ids: &[String], reference_genome: ReferenceGenome) -> String {
    let variant_queries = variant_ids
        .iter()
        .enumerate()
        .map(|(idx, variant_id)| {
            format!(
                "v{idx}: clinvar_variant(variant_id: \"{variant_id}\", reference_genome: {reference_genome}) {{\n    variant_id\n    submissions {{\n      clinical_significance\n    }}\n  }}"
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ");

    format!("query ClinVarSubmissions {{\n  {variant_queries}\n}}")
}

/// Build the submissions request for one batch against the dataset's endpoint.
pub fn build_submissions_request(variant_ids: &[String], version_config: &VersionConfig) -> GraphqlRequest {
    GraphqlRequest {
        endpoint: version_config.api_endpoint.clone(),
        query: build_submissions_query(variant_ids, version_config.reference_genome),
        variables: Default::default(),
    }
}

/// Parse a submissions response payload into a variant-id keyed map.
///
/// Entries that are `null` or have no submissions are skipped.
pub fn parse_submissions_data(
    data: SubmissionsData,
) -> rustc_hash::FxHashMap<String, Vec<ClinvarSubmission>> {
    data.into_values()
        .flatten()
        .filter_map(|entry| {
            entry
                .submissions
                .map(|submissions| (entry.variant_id, submissions))
        })
        .collect()
}

/// Parse a submissions response from a JSON string.
///
/// # Errors
///
/// If the JSON is malformed or the server reported an error.
pub fn parse_response(
    json: &str,
) -> Result<rustc_hash::FxHashMap<String, Vec<ClinvarSubmission>>, anyhow::Error> {
    let response: GraphqlResponse<SubmissionsData> = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("problem parsing submissions response: {}", e))?;
    Ok(parse_submissions_data(response.into_data()?))
}

/// Load a submissions response from a JSON file.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn load_file<P>(
    path: P,
) -> Result<rustc_hash::FxHashMap<String, Vec<ClinvarSubmission>>, anyhow::Error>
where
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(path.as_ref())
        .map_err(|e| anyhow::anyhow!("problem reading file: {}", e))?;
    let result = parse_response(&json)?;
    tracing::debug!("read submissions for {} variants", result.len());

    Ok(result)
}
