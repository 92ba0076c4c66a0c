//! Provider identity - Selects a text-generation backend

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Closed set of text-generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderIdentity {
    /// OpenAI-compatible inference server on the local network (LM Studio)
    #[default]
    LocalInference,
    /// Managed cloud text-generation API (Gemini)
    CloudApi,
}

impl ProviderIdentity {
    /// All supported providers
    pub const ALL: [Self; 2] = [Self::LocalInference, Self::CloudApi];

    /// Symbolic name used in requests and configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LocalInference => "local-inference",
            Self::CloudApi => "cloud-api",
        }
    }

    /// Human-readable name of the backend behind this provider
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::LocalInference => "LM Studio",
            Self::CloudApi => "Gemini",
        }
    }

    /// Parse from a symbolic name (case-insensitive)
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local-inference" => Some(Self::LocalInference),
            "cloud-api" => Some(Self::CloudApi),
            _ => None,
        }
    }
}

impl FromStr for ProviderIdentity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| DomainError::UnknownProvider(s.to_string()))
    }
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_returns_symbolic_names() {
        assert_eq!(ProviderIdentity::LocalInference.as_str(), "local-inference");
        assert_eq!(ProviderIdentity::CloudApi.as_str(), "cloud-api");
    }

    #[test]
    fn backend_names() {
        assert_eq!(ProviderIdentity::LocalInference.backend_name(), "LM Studio");
        assert_eq!(ProviderIdentity::CloudApi.backend_name(), "Gemini");
    }

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(
            ProviderIdentity::from_name("Local-Inference"),
            Some(ProviderIdentity::LocalInference)
        );
        assert_eq!(
            ProviderIdentity::from_name("CLOUD-API"),
            Some(ProviderIdentity::CloudApi)
        );
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "openai".parse::<ProviderIdentity>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownProvider(name) if name == "openai"));
        assert!("".parse::<ProviderIdentity>().is_err());
        assert!("local inference".parse::<ProviderIdentity>().is_err());
    }

    #[test]
    fn default_is_local_inference() {
        assert_eq!(ProviderIdentity::default(), ProviderIdentity::LocalInference);
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&ProviderIdentity::CloudApi).unwrap();
        assert_eq!(json, "\"cloud-api\"");
        let parsed: ProviderIdentity = serde_json::from_str("\"local-inference\"").unwrap();
        assert_eq!(parsed, ProviderIdentity::LocalInference);
    }

    #[test]
    fn display_matches_as_str() {
        for identity in ProviderIdentity::ALL {
            assert_eq!(identity.to_string(), identity.as_str());
        }
    }
}
