use crate::glb::GlbError;

/// Why a model could not be loaded.
#[derive(Debug)]
pub enum ModelLoadError {
    Fetch { url: String, message: String },
    Status { url: String, status: u16 },
    Parse { url: String, source: GlbError },
}

impl std::fmt::Display for ModelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelLoadError::Fetch { url, message } => write!(f, "failed to fetch {url}: {message}"),
            ModelLoadError::Status { url, status } => {
                write!(f, "failed to fetch {url}: HTTP {status}")
            }
            ModelLoadError::Parse { url, source } => write!(f, "failed to parse {url}: {source}"),
        }
    }
}

impl std::error::Error for ModelLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelLoadError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
