use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Wiki request failed")]
    Request,
    #[error("Wiki response could not be parsed")]
    Parse,
    #[error("Could not write to output directory: {0}")]
    OutputDir(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST_FAILED",
            Self::Parse => "PARSE_FAILED",
            Self::OutputDir(_) => "IO_FAILED",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorJson {
    pub ok: bool,
    pub error: String,
    pub code: String,
}

/// Per-category run record. `file` and `detail` are empty when not applicable.
#[derive(Debug, Serialize)]
pub struct IconOutcome {
    pub category: String,
    pub status: String,
    pub file: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub ok: bool,
    pub count: usize,
    pub saved: usize,
    pub items: Vec<IconOutcome>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub ok: bool,
    pub count: usize,
    pub items: Vec<String>,
}

// Action API envelopes (formatversion=2: `pages` and `imageinfo` are arrays).

#[derive(Debug, Deserialize)]
pub struct QueryEnvelope {
    pub query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    pub pages: Option<Vec<PageRecord>>,
    pub search: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
pub struct PageRecord {
    pub thumbnail: Option<Thumbnail>,
    pub imageinfo: Option<Vec<ImageInfo>>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageInfo {
    pub thumburl: Option<String>,
    pub url: Option<String>,
}
