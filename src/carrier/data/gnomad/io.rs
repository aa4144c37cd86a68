//! I/O code for gnomAD gene variant query responses.

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::{
    carrier::{
        data::{GraphqlRequest, GraphqlResponse},
        ds::{ClinvarVariant, Variant},
    },
    common::VersionConfig,
};

/// The GraphQL query for all variants of a gene.
///
/// Variables are `$geneSymbol`, `$dataset` and `$referenceGenome`.  Population
/// allele frequencies are not part of the response and must be computed from
/// `ac` and `an`.
pub const GENE_VARIANTS_QUERY: &str = r#"
query GeneVariants($geneSymbol: String!, $dataset: DatasetId!, $referenceGenome: ReferenceGenomeId!) {
  gene(gene_symbol: $geneSymbol, reference_genome: $referenceGenome) {
    gene_id
    symbol
    variants(dataset: $dataset) {
      variant_id
      pos
      ref
      alt
      exome { ac an populations { id ac an } }
      genome { ac an populations { id ac an } }
      transcript_consequence {
        gene_symbol
        transcript_id
        canonical
        consequence_terms
        lof
        lof_filter
        lof_flags
        hgvsc
        hgvsp
      }
    }
    clinvar_variants {
      variant_id
      clinical_significance
      gold_stars
      review_status
      pos
      ref
      alt
    }
  }
}
"#;

/// Build the request for all variants of a gene in the given dataset.
pub fn build_gene_variants_request(gene_symbol: &str, version_config: &VersionConfig) -> GraphqlRequest {
    let mut variables = serde_json::Map::new();
    variables.insert("geneSymbol".into(), gene_symbol.into());
    variables.insert("dataset".into(), version_config.dataset_id.as_str().into());
    variables.insert(
        "referenceGenome".into(),
        version_config.reference_genome.to_string().into(),
    );

    GraphqlRequest {
        endpoint: version_config.api_endpoint.clone(),
        query: GENE_VARIANTS_QUERY.trim().to_string(),
        variables,
    }
}

/// Deserialize JSON `null` as the default value.
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value: Option<T> = Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// The `gene` record of the response.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize, serde::Serialize)]
pub struct Gene {
    /// ENSEMBL gene identifier.
    #[serde(default)]
    pub gene_id: Option<String>,
    /// Gene symbol.
    pub symbol: String,
    /// All variants of the gene in the dataset.
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub variants: Vec<Variant>,
    /// ClinVar annotations of variants in the gene.
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub clinvar_variants: Vec<ClinvarVariant>,
}

/// The `data` payload of the response.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GeneVariantsData {
    /// The gene, `null` if unknown to gnomAD.
    pub gene: Option<Gene>,
}

/// Parse a gene variants response from a JSON string.
///
/// # Errors
///
/// If the JSON is malformed, the server reported an error, or the gene is unknown.
pub fn parse_response(json: &str) -> Result<Gene, anyhow::Error> {
    let response: GraphqlResponse<GeneVariantsData> = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("problem parsing gene variants response: {}", e))?;
    response
        .into_data()?
        .gene
        .ok_or_else(|| anyhow::anyhow!("gene not found in response"))
}

/// Load gene variants response from a JSON file.
///
/// # Arguments
///
/// * `path` - Path to the JSON file with the GraphQL response.
///
/// # Returns
///
/// The gene with its variants and ClinVar annotations.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn load_file<P>(path: P) -> Result<Gene, anyhow::Error>
where
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(path.as_ref())
        .map_err(|e| anyhow::anyhow!("problem reading file: {}", e))?;
    let gene = parse_response(&json)?;
    tracing::debug!(
        "read {} variants and {} ClinVar records for {}",
        gene.variants.len(),
        gene.clinvar_variants.len(),
        &gene.symbol
    );

    Ok(gene)
}
