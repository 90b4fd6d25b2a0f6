/// Identifier of a displayable model asset.
///
/// Opaque: the viewer never checks it against a known set. An unknown
/// identifier only surfaces as a failed fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyModelId;

impl std::fmt::Display for EmptyModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "model identifier must not be empty")
    }
}

impl std::error::Error for EmptyModelId {}

impl ModelId {
    pub fn new(id: impl Into<String>) -> Result<Self, EmptyModelId> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EmptyModelId);
        }
        Ok(ModelId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ModelId;

    #[test]
    fn rejects_blank_ids() {
        assert!(ModelId::new("").is_err());
        assert!(ModelId::new("  ").is_err());
    }

    #[test]
    fn keeps_id_verbatim() {
        let id = ModelId::new("KoreaChicken_Final").expect("id");
        assert_eq!(id.as_str(), "KoreaChicken_Final");
        assert_eq!(id.to_string(), "KoreaChicken_Final");
    }
}
