//! Choice between ambient AWS credentials and a key pair stored on the node.

use std::fmt;

/// Credentials a single invocation is made with.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSelection {
    /// Defer to the SDK's default provider chain (environment, profile, instance role, ...)
    Ambient,
    /// Static key pair entered on the node
    Explicit {
        access_key_id: String,
        secret_access_key: String,
    },
}

impl CredentialSelection {
    /// Short name for logging
    pub fn mode(&self) -> &'static str {
        match self {
            CredentialSelection::Ambient => "ambient",
            CredentialSelection::Explicit { .. } => "explicit",
        }
    }
}

impl fmt::Debug for CredentialSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSelection::Ambient => f.write_str("Ambient"),
            CredentialSelection::Explicit { access_key_id, .. } => f
                .debug_struct("Explicit")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"** redacted **")
                .finish(),
        }
    }
}

/// Decide which credentials to use.
///
/// The key pair is only used when local credentials are switched off and both
/// keys are present; anything else falls back to the ambient chain.
pub fn select_credentials(
    use_local_credentials: bool,
    access_key_id: Option<&str>,
    secret_access_key: Option<&str>,
) -> CredentialSelection {
    if use_local_credentials {
        return CredentialSelection::Ambient;
    }

    match (access_key_id, secret_access_key) {
        (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
            CredentialSelection::Explicit {
                access_key_id: key.to_string(),
                secret_access_key: secret.to_string(),
            }
        }
        _ => CredentialSelection::Ambient,
    }
}
