//! Fuzzy matching for kinds and attribute names
//!
//! Uses Levenshtein distance to turn "unknown kind" and "unknown attribute"
//! failures into a "did you mean" hint.

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Suggestion result with its distance from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The suggested correction
    pub text: String,
    /// Levenshtein distance (lower = better match)
    pub distance: usize,
}

/// Find closest matches from a list of candidates, ignoring case
pub fn find_closest_matches<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max_results: usize,
) -> Vec<Suggestion> {
    let input = input.to_lowercase();
    let mut suggestions: Vec<Suggestion> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance = strsim::levenshtein(&input, &candidate.to_lowercase());
            (distance <= MAX_SUGGESTION_DISTANCE).then(|| Suggestion {
                text: candidate.to_string(),
                distance,
            })
        })
        .collect();

    // Best matches first, alphabetical among equals for stable output
    suggestions.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.text.cmp(&b.text)));
    suggestions.dedup_by(|a, b| a.text == b.text);
    suggestions.truncate(max_results);
    suggestions
}

/// Suggest a registered kind for an unknown one
pub fn suggest_kind<'a>(kind: &str, known: impl IntoIterator<Item = &'a str>) -> Option<String> {
    format_matches(&find_closest_matches(kind, known, 3))
}

/// Suggest an attribute of the target type for an unknown one
pub fn suggest_attribute<'a>(
    attribute: &str,
    type_name: &str,
    known: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let known: Vec<&str> = known.into_iter().collect();
    match format_matches(&find_closest_matches(attribute, known.iter().copied(), 3)) {
        Some(hint) => Some(hint),
        None if known.is_empty() => Some(format!("{} declares no attributes", type_name)),
        None => Some(format!(
            "Attributes of {}: {}",
            type_name,
            known.join(", ")
        )),
    }
}

fn format_matches(matches: &[Suggestion]) -> Option<String> {
    if matches.is_empty() {
        return None;
    }
    let names: Vec<String> = matches.iter().map(|s| format!("`{}`", s.text)).collect();
    Some(format!("Did you mean {}?", names.join(" or ")))
}
