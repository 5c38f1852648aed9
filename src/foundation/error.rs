use std::path::PathBuf;

pub type SpriteResult<T> = Result<T, SpriteError>;

#[derive(thiserror::Error, Debug)]
pub enum SpriteError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("config error in '{unit}': {message}")]
    Config { unit: String, message: String },

    #[error("decode error for '{}': {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpriteError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(unit: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Config {
            unit: unit.into(),
            message: msg.into(),
        }
    }

    pub fn decode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Undecodable image data, as opposed to a failure to reach the file.
    pub fn is_decode(&self) -> bool {
        match self {
            Self::Decode { .. } => true,
            Self::Image(e) => !matches!(e, image::ImageError::IoError(_)),
            _ => false,
        }
    }

    /// Errors that should drop a single frame instead of the whole animation.
    pub fn is_transient_access(&self) -> bool {
        let io = match self {
            Self::Io(e) => e,
            Self::Image(image::ImageError::IoError(e)) => e,
            _ => return false,
        };
        matches!(
            io.kind(),
            std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::WouldBlock
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            SpriteError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        let cfg = SpriteError::config("skullgirls/filia", "avg_char_height is required");
        assert_eq!(
            cfg.to_string(),
            "config error in 'skullgirls/filia': avg_char_height is required"
        );
        assert!(
            SpriteError::decode("a/b.png", "bad header")
                .to_string()
                .contains("a/b.png")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = SpriteError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn permission_denied_is_transient() {
        let err = SpriteError::from(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied,
        ));
        assert!(err.is_transient_access());
        assert!(!SpriteError::validation("x").is_transient_access());
    }

    #[test]
    fn decode_errors_exclude_io() {
        assert!(SpriteError::decode("a.png", "bad header").is_decode());
        let unsupported = image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::GenericFeature("x".into()),
            ),
        );
        assert!(SpriteError::from(unsupported).is_decode());
        let io = image::ImageError::IoError(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(!SpriteError::from(io).is_decode());
        assert!(!SpriteError::validation("x").is_decode());
    }
}
