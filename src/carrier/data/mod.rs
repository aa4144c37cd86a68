//! Representation and I/O of datasets.

pub mod clinvar;
pub mod gnomad;

/// A GraphQL request as sent to the API.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GraphqlRequest {
    /// Endpoint to POST the request to.
    pub endpoint: String,
    /// The query text.
    pub query: String,
    /// Query variables.
    #[serde(default)]
    pub variables: serde_json::Map<String, serde_json::Value>,
}

/// Error entry of a GraphQL response.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GraphqlError {
    /// The error message.
    pub message: String,
}

/// Envelope of a GraphQL response.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GraphqlResponse<T> {
    /// The payload, absent on hard errors.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Errors reported by the server.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
    /// Return the payload or the first reported error.
    ///
    /// # Errors
    ///
    /// If the server reported an error or there is no payload.
    pub fn into_data(self) -> Result<T, anyhow::Error> {
        if let Some(error) = self.errors.first() {
            anyhow::bail!("GraphQL error: {}", error.message);
        }
        self.data
            .ok_or_else(|| anyhow::anyhow!("GraphQL response without data"))
    }
}

#[cfg(test)]
mod test {
    use super::GraphqlResponse;

    #[test]
    fn into_data_ok() -> Result<(), anyhow::Error> {
        let response: GraphqlResponse<u32> = serde_json::from_str(r#"{"data": 42}"#)?;

        assert_eq!(response.into_data()?, 42);

        Ok(())
    }

    #[test]
    fn into_data_error() -> Result<(), anyhow::Error> {
        let response: GraphqlResponse<u32> = serde_json::from_str(
            r#"{"data": null, "errors": [{"message": "Gene not found"}]}"#,
        )?;

        let err = response.into_data().unwrap_err();
        assert_eq!(err.to_string(), "GraphQL error: Gene not found");

        Ok(())
    }

    #[test]
    fn into_data_missing() -> Result<(), anyhow::Error> {
        let response: GraphqlResponse<u32> = serde_json::from_str(r#"{}"#)?;

        assert!(response.into_data().is_err());

        Ok(())
    }
}
