use super::{normalize, EmbeddingBackend};
use crate::error::{Result, VectorStoreError};
use crate::similarity::ensure_finite;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_HTTP_DIMENSION: usize = 1024;

/// Remote embedding API speaking `{"model", "input"}` JSON over POST
pub struct HttpEmbeddingBackend {
    client: Client,
    endpoint: String,
    name: String,
    dimension: usize,
    api_key: Option<String>,
}

impl HttpEmbeddingBackend {
    pub fn new(
        endpoint: impl Into<String>,
        name: impl Into<String>,
        dimension: usize,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| VectorStoreError::embedding(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            name: name.into(),
            dimension,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmbeddingBackend for HttpEmbeddingBackend {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        log::debug!("Requesting embedding from {}", self.endpoint);

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "model": self.name, "input": text }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VectorStoreError::embedding(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::embedding(format!(
                "HTTP request failed with code {}: {body}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VectorStoreError::embedding(format!("Invalid JSON response: {e}")))?;

        let mut vector = extract_embedding(&body)?;
        ensure_finite(&vector, "embedding response")?;
        if vector.len() != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        normalize(&mut vector);
        Ok(vector)
    }
}

/// Accepts `data[0].embedding`, `embedding` or `embeddings[0]`
fn extract_embedding(body: &Value) -> Result<Vec<f32>> {
    let array = body
        .pointer("/data/0/embedding")
        .or_else(|| body.get("embedding"))
        .or_else(|| body.pointer("/embeddings/0"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            VectorStoreError::embedding("Could not extract embedding from API response")
        })?;

    array
        .iter()
        .map(|value| {
            value
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| VectorStoreError::embedding(format!("Non-numeric embedding value: {value}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_all_response_shapes() {
        let shapes = [
            json!({ "data": [{ "embedding": [1.0, 2.0] }] }),
            json!({ "embedding": [1.0, 2.0] }),
            json!({ "embeddings": [[1.0, 2.0], [3.0, 4.0]] }),
        ];
        for body in &shapes {
            assert_eq!(extract_embedding(body).unwrap(), vec![1.0, 2.0]);
        }
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert!(extract_embedding(&json!({ "vector": [1.0] })).is_err());
        assert!(extract_embedding(&json!({ "embedding": ["a"] })).is_err());
        assert!(extract_embedding(&json!({ "data": [] })).is_err());
    }

    #[test]
    fn out_of_range_values_do_not_pass_as_finite() {
        let vector = extract_embedding(&json!({ "embedding": [1e39, 1.0] })).unwrap();
        assert!(matches!(
            ensure_finite(&vector, "embedding response"),
            Err(VectorStoreError::NonFiniteVector(_))
        ));
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let backend =
            HttpEmbeddingBackend::new("http://localhost/embed", "m", 4, Some("  ".into())).unwrap();
        assert!(backend.api_key.is_none());
        assert_eq!(backend.endpoint(), "http://localhost/embed");
    }
}
