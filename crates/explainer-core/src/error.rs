pub type ExplainerResult<T> = Result<T, ExplainerError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExplainerError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("scene index {index} out of range (total scenes: {total})")]
    SceneOutOfRange { index: usize, total: usize },

    #[error("surface error: {0}")]
    Surface(String),
}

impl ExplainerError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(ExplainerError::invalid_config("x")
            .to_string()
            .contains("invalid config:"));
        assert!(ExplainerError::surface("x")
            .to_string()
            .contains("surface error:"));
        let err = ExplainerError::SceneOutOfRange { index: 7, total: 5 };
        assert_eq!(
            err.to_string(),
            "scene index 7 out of range (total scenes: 5)"
        );
    }
}
