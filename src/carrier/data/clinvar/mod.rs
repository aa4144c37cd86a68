//! Code for accessing ClinVar submissions of variants.

use std::path::Path;

use crate::carrier::ds::ClinvarSubmission;

pub mod io;

/// Facade struct for the submissions of variants, keyed by variant identifier.
///
/// Submissions arrive in batches; later batches are merged into the existing data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submissions {
    /// Mapping from variant identifier to its submissions.
    by_variant_id: rustc_hash::FxHashMap<String, Vec<ClinvarSubmission>>,
}

impl Submissions {
    /// Load from one or more submissions response files.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn load<P>(paths: &[P]) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let mut result = Self::default();
        for path in paths {
            let batch = io::load_file(path).map_err(|e| {
                anyhow::anyhow!(
                    "problem loading submissions from {}: {}",
                    path.as_ref().display(),
                    e
                )
            })?;
            result.merge(batch);
        }
        Ok(result)
    }

    /// Merge the given batch, replacing existing entries for the same variant.
    pub fn merge<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = (String, Vec<ClinvarSubmission>)>,
    {
        self.by_variant_id.extend(batch);
    }

    /// Submissions for the given variant, if any were fetched.
    pub fn by_variant_id(&self, variant_id: &str) -> Option<&[ClinvarSubmission]> {
        self.by_variant_id.get(variant_id).map(Vec::as_slice)
    }

    /// Number of variants with submissions.
    pub fn len(&self) -> usize {
        self.by_variant_id.len()
    }

    /// Whether no submissions have been fetched.
    pub fn is_empty(&self) -> bool {
        self.by_variant_id.is_empty()
    }
}

impl FromIterator<(String, Vec<ClinvarSubmission>)> for Submissions {
    fn from_iter<T: IntoIterator<Item = (String, Vec<ClinvarSubmission>)>>(iter: T) -> Self {
        Self {
            by_variant_id: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::carrier::ds::ClinvarSubmission;

    use super::Submissions;

    #[test]
    fn merge_replaces() {
        let mut submissions = Submissions::from_iter([(
            "1-1-A-G".to_string(),
            vec![ClinvarSubmission::new("Benign")],
        )]);
        submissions.merge([
            (
                "1-1-A-G".to_string(),
                vec![ClinvarSubmission::new("Pathogenic")],
            ),
            (
                "1-2-A-G".to_string(),
                vec![ClinvarSubmission::new("Pathogenic")],
            ),
        ]);

        assert_eq!(submissions.len(), 2);
        assert_eq!(
            submissions.by_variant_id("1-1-A-G"),
            Some(&[ClinvarSubmission::new("Pathogenic")][..])
        );
        assert!(submissions.by_variant_id("1-3-A-G").is_none());
    }

    #[tracing_test::traced_test]
    #[test]
    fn load() -> Result<(), anyhow::Error> {
        let submissions = Submissions::load(&["tests/data/carrier/submissions.json"])?;

        assert_eq!(submissions.len(), 2);
        assert_eq!(
            submissions
                .by_variant_id("1-1005-T-C")
                .map(|s| s.len())
                .unwrap_or_default(),
            4
        );

        Ok(())
    }
}
