//! Selection Matching Module
//!
//! Decides which detected risk (if any) a player's selection refers to.
//!
//! A risk is a candidate when its recorded text contains the selection or the
//! selection contains the recorded text. The longest candidate wins and ties
//! go to the earliest risk in the list. This is plain substring containment,
//! not text alignment: a selection that only partially overlaps a clause
//! without either side containing the other does not match.

use crate::models::types::Risk;

/// Whether `risk` overlaps `selection` by containment in either direction
#[inline]
pub fn is_candidate(risk: &Risk, selection: &str) -> bool {
    !risk.text.is_empty()
        && !selection.is_empty()
        && (risk.text.contains(selection) || selection.contains(risk.text.as_str()))
}

/// Best matching risk for a (trimmed) selection
pub fn find_best_match<'a>(risks: &'a [Risk], selection: &str) -> Option<&'a Risk> {
    let mut best: Option<&Risk> = None;
    for risk in risks.iter().filter(|r| is_candidate(r, selection)) {
        // Strictly longer only, so the first of equal-length candidates stays.
        if best.map_or(true, |b| text_len(risk) > text_len(b)) {
            best = Some(risk);
        }
    }
    best
}

fn text_len(risk: &Risk) -> usize {
    risk.text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(text: &str) -> Risk {
        Risk::new("Clause", text, "", "High")
    }

    #[test]
    fn test_longest_candidate_wins() {
        let risks = vec![risk("A"), risk("ABC")];
        let found = find_best_match(&risks, "AB").unwrap();
        assert_eq!(found.text, "ABC");
    }

    #[test]
    fn test_selection_containing_clause_matches() {
        let risks = vec![risk("shall indemnify")];
        let found = find_best_match(&risks, "The Client shall indemnify the Supplier");
        assert!(found.is_some());
    }

    #[test]
    fn test_tie_keeps_first_occurrence() {
        let risks = vec![
            Risk::new("First", "liable", "", "Low"),
            Risk::new("Second", "liable", "", "High"),
        ];
        assert_eq!(find_best_match(&risks, "liable").unwrap().kind, "First");
    }

    #[test]
    fn test_partial_overlap_is_not_a_match() {
        let risks = vec![risk("terminate at will")];
        assert!(find_best_match(&risks, "at will without notice").is_none());
    }

    #[test]
    fn test_empty_inputs_never_match() {
        assert!(find_best_match(&[], "anything").is_none());
        let risks = vec![risk("")];
        assert!(find_best_match(&risks, "anything").is_none());
        assert!(!is_candidate(&risk("abc"), ""));
    }
}
