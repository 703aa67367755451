//! Assembly of the user turn sent to the model.

use crate::lookup::VerifiedFact;

/// Crude intent check for "find me a doctor" style requests
const PROVIDER_KEYWORDS: [&str; 3] = ["provider", "doctor", "near"];

const PROVIDER_SEARCH_HINT: &str = "IMPORTANT: This looks like a provider search. Use the Google Search tool to find results and populate the 'providers' array in your JSON output.";

pub fn is_provider_search(text: &str) -> bool {
    let lower = text.to_lowercase();
    PROVIDER_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Final prompt text: the verified fact with grounding rules first (when
/// there is one), then the user's words, then the provider-search hint.
pub fn compose_prompt(user_text: &str, fact: Option<&VerifiedFact>) -> String {
    let mut prompt = match fact {
        Some(fact) => format!(
            "{fact}\n\n\
             IMPORTANT INSTRUCTION: Use the verified data above to populate the 'data' object in your JSON response.\n\
             - Set \"type\" to \"{kind}\".\n\
             - Set \"code\" to {code}.\n\
             - Set \"procedureName\" to the name from the verified data.\n\
             - Set \"description\" to the full description from the verified data.\n\n\
             User Query: {user_text}",
            fact = fact,
            kind = fact.kind().label().to_lowercase(),
            code = fact.code,
            user_text = user_text,
        ),
        None => user_text.to_string(),
    };

    if is_provider_search(user_text) {
        prompt.push_str("\n\n");
        prompt.push_str(PROVIDER_SEARCH_HINT);
    }
    prompt
}
