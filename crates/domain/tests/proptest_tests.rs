//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{DomainError, Prompt, ProviderIdentity};
use proptest::prelude::*;

// ============================================================================
// Prompt Property Tests
// ============================================================================

mod prompt_tests {
    use super::*;

    proptest! {
        #[test]
        fn text_with_visible_content_is_accepted(
            prefix in "[ \t\n]{0,4}",
            body in "[a-zA-Z0-9?!.,]{1,64}",
            suffix in "[ \t\n]{0,4}"
        ) {
            let text = format!("{prefix}{body}{suffix}");
            let prompt = Prompt::new(text.clone());
            prop_assert!(prompt.is_ok());
            let prompt = prompt.unwrap();
            prop_assert_eq!(prompt.as_str(), text.as_str());
        }

        #[test]
        fn whitespace_only_is_rejected(text in "[ \t\n\r]{0,32}") {
            let result = Prompt::new(text);
            prop_assert!(matches!(result, Err(DomainError::EmptyPrompt)));
        }
    }
}

// ============================================================================
// ProviderIdentity Property Tests
// ============================================================================

mod provider_identity_tests {
    use super::*;

    proptest! {
        #[test]
        fn names_outside_the_set_are_rejected(name in "[a-z_ ]{0,20}") {
            prop_assume!(name.trim() != "local-inference" && name.trim() != "cloud-api");
            let result = name.parse::<ProviderIdentity>();
            prop_assert!(matches!(result, Err(DomainError::UnknownProvider(_))));
        }

        #[test]
        fn symbolic_names_parse_in_any_case(upper in any::<bool>(), index in 0usize..2) {
            let identity = ProviderIdentity::ALL[index];
            let name = if upper {
                identity.as_str().to_uppercase()
            } else {
                identity.as_str().to_string()
            };
            prop_assert_eq!(name.parse::<ProviderIdentity>().ok(), Some(identity));
        }
    }
}
