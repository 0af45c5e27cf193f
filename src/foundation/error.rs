pub type SashResult<T> = Result<T, SashError>;

#[derive(thiserror::Error, Debug)]
pub enum SashError {
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SashError {
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            SashError::surface("x")
                .to_string()
                .contains("surface unavailable:")
        );
        assert!(SashError::decode("x").to_string().contains("decode error:"));
        assert!(SashError::encode("x").to_string().contains("encode error:"));
        assert!(
            SashError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            SashError::generation("x")
                .to_string()
                .contains("generation error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = SashError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
