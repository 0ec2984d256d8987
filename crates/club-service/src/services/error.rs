//! Errors returned by the use-case services.

use club_common::{domain_status, AppError};
use club_core::DomainError;
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    /// A club rule rejected the operation
    Domain(DomainError),

    /// Authentication or infrastructure failure surfaced by `club-common`
    App(AppError),

    /// The request was well-formed but asks for nothing sensible
    BadRequest(String),

    /// `ServiceContextBuilder::build` ran without this dependency
    MissingDependency(&'static str),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// The rule that failed, looking through `AppError::Domain` too
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::App(AppError::Domain(e)) => Some(e),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Domain(e) => e.field(),
            Self::App(e) => e.field(),
            Self::BadRequest(_) | Self::MissingDependency(_) => None,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::BadRequest(_) => 400,
            Self::MissingDependency(_) => 500,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::BadRequest(_) => "VALIDATION_ERROR",
            Self::MissingDependency(_) => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::BadRequest(msg) => f.write_str(msg),
            Self::MissingDependency(name) => write!(f, "service context is missing {name}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            Self::BadRequest(_) | Self::MissingDependency(_) => None,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::BadRequest(msg) => AppError::Validation(msg),
            ServiceError::MissingDependency(name) => {
                AppError::Internal(anyhow::anyhow!("service context is missing {name}"))
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
