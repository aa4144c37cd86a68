//! Carrier frequency estimation from gnomAD population data and ClinVar evidence.
//!
//! The `carrier` module holds the engine: variant classification, resolution of
//! conflicting ClinVar classifications, population frequency aggregation and
//! recurrence risk.  The `risk` module is a thin command around the latter, and
//! `query` writes the GraphQL request for fetching a gene's variants.

pub mod carrier;
pub mod common;
pub mod query;
pub mod risk;
