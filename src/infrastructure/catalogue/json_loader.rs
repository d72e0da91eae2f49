//! JSON Catalogue Loader
//!
//! 目录文件格式（与原始数据文件一致）:
//! ```json
//! {
//!   "topics": [{"id": 1, "name": "...", "sentence_ids": [1, 2]}],
//!   "sentences": [{"id": 1, "english": "...", "chinese": "...", "core_words": [], ...}]
//! }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{Catalogue, Sentence, Topic};

/// 目录加载错误
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Failed to read catalogue {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalogue: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 目录文件结构
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogueFile {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

impl From<CatalogueFile> for Catalogue {
    fn from(file: CatalogueFile) -> Self {
        Catalogue::new(file.topics, file.sentences)
    }
}

/// 从 JSON 文本构建目录
pub fn parse_catalogue(json: &str) -> Result<Catalogue, CatalogueError> {
    let file: CatalogueFile = serde_json::from_str(json)?;
    Ok(file.into())
}

/// 读取并解析目录文件
pub async fn load_catalogue(path: impl AsRef<Path>) -> Result<Catalogue, CatalogueError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let catalogue = parse_catalogue(&json)?;

    tracing::info!(
        path = %path.display(),
        topics = catalogue.topics().len(),
        sentences = catalogue.index().len(),
        "Catalogue loaded"
    );

    let unresolved: usize = catalogue
        .topics()
        .iter()
        .map(|t| t.declared_len() - catalogue.resolve_sentences(t).count())
        .sum();
    if unresolved > 0 {
        tracing::warn!(unresolved, "Topics reference sentences missing from the catalogue");
    }

    Ok(catalogue)
}
