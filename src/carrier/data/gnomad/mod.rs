//! Code for accessing the variants of a gene as returned by gnomAD.

use std::path::Path;

use crate::carrier::ds::{ClinvarVariant, Variant};

pub mod io;

pub use io::Gene;

/// Facade struct that allows easy access to the variants of one gene.
#[derive(Debug, Clone)]
pub struct Data {
    /// The gene with its variants and ClinVar annotations.
    gene: Gene,
    /// Mapping from variant identifier to ClinVar annotation index.
    variant_to_clinvar_idx: rustc_hash::FxHashMap<String, usize>,
}

impl Data {
    /// Load from file and construct.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        Ok(Self::new(io::load_file(path)?))
    }

    /// Create a new `Data` object.
    ///
    /// If a variant has more than one ClinVar annotation, the first one wins.
    ///
    /// # Arguments
    ///
    /// * `gene` - The gene record.
    ///
    /// # Returns
    ///
    /// A new `Data` object.
    pub fn new(gene: Gene) -> Self {
        let mut variant_to_clinvar_idx = rustc_hash::FxHashMap::default();
        for (idx, record) in gene.clinvar_variants.iter().enumerate() {
            variant_to_clinvar_idx
                .entry(record.variant_id.clone())
                .or_insert(idx);
        }
        Self {
            gene,
            variant_to_clinvar_idx,
        }
    }

    /// The gene symbol.
    pub fn symbol(&self) -> &str {
        &self.gene.symbol
    }

    /// All variants of the gene.
    pub fn variants(&self) -> &[Variant] {
        &self.gene.variants
    }

    /// All ClinVar annotations of the gene.
    pub fn clinvar_variants(&self) -> &[ClinvarVariant] {
        &self.gene.clinvar_variants
    }

    /// Get the ClinVar annotation for the given variant identifier.
    ///
    /// # Arguments
    ///
    /// * `variant_id` - Variant identifier of the form `CHROM-POS-REF-ALT`.
    ///
    /// # Returns
    ///
    /// The ClinVar annotation, if any.
    pub fn clinvar_by_variant_id(&self, variant_id: &str) -> Option<&ClinvarVariant> {
        self.variant_to_clinvar_idx
            .get(variant_id)
            .map(|idx| &self.gene.clinvar_variants[*idx])
    }
}

#[cfg(test)]
mod test {
    #[tracing_test::traced_test]
    #[test]
    fn data_load() -> Result<(), anyhow::Error> {
        let data = super::Data::load("tests/data/carrier/gene_variants.json")?;

        assert_eq!(data.symbol(), "DEMO1");
        assert_eq!(data.variants().len(), 6);
        insta::assert_yaml_snapshot!(data.clinvar_by_variant_id("1-1002-G-A"), @r###"
        variant_id: 1-1002-G-A
        clinical_significance: Pathogenic
        gold_stars: 2
        review_status: "criteria provided, multiple submitters, no conflicts"
        pos: 1002
        ref: G
        alt: A
        "###);
        assert!(data.clinvar_by_variant_id("1-9999-A-T").is_none());

        Ok(())
    }
}
