use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntrolyticsErrorCode {
    InvalidArgument,
    NotInitialized,
    DuplicateScope,
    Internal,
    Network,
}

impl EntrolyticsErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrolyticsErrorCode::InvalidArgument => "entrolytics/invalid-argument",
            EntrolyticsErrorCode::NotInitialized => "entrolytics/not-initialized",
            EntrolyticsErrorCode::DuplicateScope => "entrolytics/duplicate-scope",
            EntrolyticsErrorCode::Internal => "entrolytics/internal",
            EntrolyticsErrorCode::Network => "entrolytics/network",
        }
    }
}

#[derive(Clone, Debug)]
pub struct EntrolyticsError {
    pub code: EntrolyticsErrorCode,
    message: String,
}

impl EntrolyticsError {
    pub fn new(code: EntrolyticsErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl Display for EntrolyticsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for EntrolyticsError {}

pub type EntrolyticsResult<T> = Result<T, EntrolyticsError>;

pub fn invalid_argument(message: impl Into<String>) -> EntrolyticsError {
    EntrolyticsError::new(EntrolyticsErrorCode::InvalidArgument, message)
}

pub fn not_initialized(message: impl Into<String>) -> EntrolyticsError {
    EntrolyticsError::new(EntrolyticsErrorCode::NotInitialized, message)
}

pub fn duplicate_scope(message: impl Into<String>) -> EntrolyticsError {
    EntrolyticsError::new(EntrolyticsErrorCode::DuplicateScope, message)
}

pub fn internal_error(message: impl Into<String>) -> EntrolyticsError {
    EntrolyticsError::new(EntrolyticsErrorCode::Internal, message)
}

pub fn network_error(message: impl Into<String>) -> EntrolyticsError {
    EntrolyticsError::new(EntrolyticsErrorCode::Network, message)
}
