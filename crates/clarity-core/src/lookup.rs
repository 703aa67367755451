//! Code-verification lookup.
//!
//! Short code-like input (CPT, HCPCS, ICD-10, NDC) is checked against the
//! external registries before the model sees it, so the answer can be
//! grounded in the official code and label instead of the model's guess.

use std::fmt;

use clarity_types::price::PriceKind;

use crate::ports::{CodeRegistry, CodeRegistryPort, RegistryMatch};

const MIN_CODE_LEN: usize = 3;
const MAX_CODE_LEN: usize = 12;

/// A registry-confirmed code and its official label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedFact {
    pub registry: CodeRegistry,
    pub code: String,
    pub label: String,
}

impl VerifiedFact {
    pub fn kind(&self) -> PriceKind {
        self.registry.kind()
    }
}

impl fmt::Display for VerifiedFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Verified Data ({}): Code {} is {}. Type: {}.",
            self.registry.label(),
            self.code,
            self.label,
            self.kind().label()
        )
    }
}

/// 3–12 characters of letters, digits, `.` and `-`.
pub fn looks_like_code(term: &str) -> bool {
    let term = term.trim();
    (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&term.len())
        && term
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// Try each registry in order and stop at the first match.
///
/// A failing registry counts as "no match"; the next one is still tried.
pub async fn verify_code(term: &str, registry: &dyn CodeRegistryPort) -> Option<VerifiedFact> {
    let term = term.trim();
    if !looks_like_code(term) {
        return None;
    }

    for source in CodeRegistry::LOOKUP_ORDER {
        match registry.search(source, term).await {
            Ok(Some(RegistryMatch { code, label })) => {
                log::info!("{} matched {} registry as {}", term, source.label(), code);
                return Some(VerifiedFact {
                    registry: source,
                    code,
                    label,
                });
            }
            Ok(None) => {}
            Err(e) => log::warn!("{} lookup failed for {}: {}", source.label(), term, e),
        }
    }
    None
}
