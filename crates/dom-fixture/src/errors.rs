use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid yaml fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid json fixture: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid data-rect `{0}`")]
    InvalidRect(String),
    #[error("frame `{0}` nests too deeply")]
    FrameDepth(String),
}
