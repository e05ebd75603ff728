use thiserror::Error;

/// Why a checked constructor refused to bind.
///
/// The plain constructors treat the same inputs as "leave the callback unbound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("function pointer is null")]
    NullFunction,
    #[error("target object pointer is null")]
    NullObject,
    #[error("method pointer is null")]
    NullMethod,
}
