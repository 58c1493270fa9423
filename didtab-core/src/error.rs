use thiserror::Error;

/// Result type for DIDs tab operations.
pub type DidTabResult<T> = Result<T, DidTabError>;

/// Error outputs from the DIDs tab core.
#[derive(Debug, Error, uniffi::Error)]
pub enum DidTabError {
    /// The wallet password was rejected, or the keyring could not produce the recovery phrase.
    ///
    /// This is the only error surfaced to the user; `reason` is shown under the password field.
    #[error("{reason}")]
    CredentialVerificationFailed {
        /// Human-readable reason reported by the verifier.
        reason: String,
    },
    /// The tab was torn down; no further state transitions are accepted.
    #[error("torn_down")]
    TornDown,
}

/// Failure returned by a [`CredentialVerifier`](crate::CredentialVerifier).
///
/// The display string is what ends up in the password prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum VerificationError {
    /// The verifier refused the credential, e.g. an incorrect password.
    #[error("{reason}")]
    Rejected {
        /// Human-readable reason, shown to the user verbatim.
        reason: String,
    },
    /// The foreign verifier failed in an unexpected way.
    #[error("unexpected verifier error: {0}")]
    Unexpected(String),
}

impl VerificationError {
    /// The message reported to the user and to analytics.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for VerificationError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Unexpected(error.reason)
    }
}

impl From<VerificationError> for DidTabError {
    fn from(error: VerificationError) -> Self {
        Self::CredentialVerificationFailed {
            reason: error.reason(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_failure_keeps_reason() {
        let error = DidTabError::from(VerificationError::Rejected {
            reason: "incorrect password".to_string(),
        });
        assert!(matches!(
            &error,
            DidTabError::CredentialVerificationFailed { reason } if reason == "incorrect password"
        ));
        assert_eq!(error.to_string(), "incorrect password");
    }

    #[test]
    fn test_callback_failure_is_unexpected_verification_error() {
        let error = VerificationError::from(uniffi::UnexpectedUniFFICallbackError {
            reason: "host crashed".to_string(),
        });
        assert_eq!(error, VerificationError::Unexpected("host crashed".to_string()));
        assert_eq!(error.reason(), "unexpected verifier error: host crashed");
    }
}
