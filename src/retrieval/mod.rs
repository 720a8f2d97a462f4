use async_trait::async_trait;
use reqwest::Client;
use rusqlite::{Connection, OpenFlags};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::errors::ForgeError;

/// Single-passage similarity lookup. The pipeline composes context
/// unconditionally, so an empty result is fatal for the request.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<String, ForgeError>;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ForgeError>;
}

/// OpenAI embeddings endpoint, one vector per call.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiEmbedder {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: cfg.api_key.clone(),
            model: cfg.embedding_model.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ForgeError> {
        #[derive(Deserialize)]
        struct EmbeddingRow {
            embedding: Vec<f32>,
        }
        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingRow>,
        }

        let body = json!({ "model": self.model, "input": text });

        let resp = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::Retrieval(format!("embedding request failed: {e}")))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| ForgeError::Retrieval(format!("embedding response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(ForgeError::Retrieval(format!(
                "embedding API error ({status}): {raw}"
            )));
        }

        let parsed: EmbeddingResponse = serde_json::from_str(&raw)
            .map_err(|e| ForgeError::Retrieval(format!("embedding response malformed: {e}")))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|r| r.embedding)
            .ok_or_else(|| ForgeError::Retrieval("embedding API returned no vector".into()))
    }
}

/// A passage loaded from the local vector store.
#[derive(Debug, Clone)]
struct IndexedPassage {
    content: String,
    embedding: Vec<f32>,
}

/// Read-only sqlite vector store: table `vectors(id, content, embedding)`
/// where `embedding` holds a JSON float array. The query is embedded through
/// the `Embedder` seam and ranked by cosine similarity; only the top-1 match
/// is returned.
pub struct SqliteVectorIndex<E: Embedder> {
    db_path: PathBuf,
    embedder: E,
}

impl<E: Embedder> SqliteVectorIndex<E> {
    pub fn open(cfg: &Config, embedder: E) -> Self {
        Self::at_path(Path::new(&cfg.index_dir).join("vectors.sqlite"), embedder)
    }

    pub fn at_path(db_path: PathBuf, embedder: E) -> Self {
        Self { db_path, embedder }
    }

    fn load_passages(&self) -> Result<Vec<IndexedPassage>, ForgeError> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| {
            ForgeError::Retrieval(format!("cannot open {}: {e}", self.db_path.display()))
        })?;

        let mut stmt = conn
            .prepare("SELECT content, embedding FROM vectors")
            .map_err(|e| ForgeError::Retrieval(format!("bad index schema: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                let content: String = row.get(0)?;
                let embedding_json: String = row.get(1)?;
                Ok((content, embedding_json))
            })
            .map_err(|e| ForgeError::Retrieval(format!("index query failed: {e}")))?;

        let mut passages = Vec::new();
        for row in rows {
            let (content, embedding_json) =
                row.map_err(|e| ForgeError::Retrieval(format!("index row unreadable: {e}")))?;
            let embedding: Vec<f32> = serde_json::from_str(&embedding_json)
                .map_err(|e| ForgeError::Retrieval(format!("stored vector malformed: {e}")))?;
            passages.push(IndexedPassage { content, embedding });
        }
        Ok(passages)
    }
}

#[async_trait]
impl<E: Embedder> Retriever for SqliteVectorIndex<E> {
    async fn retrieve(&self, query: &str) -> Result<String, ForgeError> {
        let passages = self.load_passages()?;
        if passages.is_empty() {
            return Err(ForgeError::Retrieval("index holds no passages".into()));
        }

        let query_vec = self.embedder.embed(query).await?;

        let best = passages
            .into_iter()
            .max_by(|a, b| {
                cosine(&a.embedding, &query_vec)
                    .partial_cmp(&cosine(&b.embedding, &query_vec))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.content);

        best.ok_or_else(|| ForgeError::Retrieval("index returned no match".into()))
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}
