use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported locale `{code}`")]
    UnsupportedLocale { code: String },
}

impl DomainError {
    pub fn unsupported_locale(code: impl Into<String>) -> Self {
        Self::UnsupportedLocale { code: code.into() }
    }
}
