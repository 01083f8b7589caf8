// file: src/search/signature.rs
// description: detection of matches that only hit a document's signature block
// reference: gazette search abstracts start with the signature when the match is in it

use crate::models::SearchResult;
use crate::search::patterns::{LEAD_AND_NAME, strip_html};
use unicode_normalization::UnicodeNormalization;

/// Lower-case, decompose and drop combining marks, so `"José"` and
/// `"JOSE"` compare equal.
pub fn normalize(text: &str) -> String {
    text.nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// At least one cased character and no lower-case ones.
fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Splits the raw abstract into the text before the first highlight tag
/// (`lead`) and the text inside it (`name`). `None` when the abstract has no
/// such markup, which only happens for matches outside a signature.
pub fn lead_and_name(raw_abstract: &str) -> Option<(&str, &str)> {
    let caps = LEAD_AND_NAME.captures(raw_abstract)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Normalized abstract with the first name of the signature removed.
///
/// The first name is the lead when there is one; when the highlighted
/// segment opens the abstract it is that segment's first word.
/// `norm_abstract` is already trimmed at the start, so the lead is too.
fn without_first_name(norm_abstract: &str, lead: &str) -> Option<String> {
    let skip = normalize(lead.trim_start()).chars().count();
    let after_lead: String = norm_abstract.chars().skip(skip).collect();
    let after_lead = after_lead.trim_start();

    if lead.trim().is_empty() {
        after_lead
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim_start().to_string())
    } else {
        Some(after_lead.to_string())
    }
}

/// True when `term` only matched because it is part of the signature that
/// opens the abstract. Signatures are rendered upper-case and the term
/// either starts the signature or follows its first name.
pub fn is_signature_match(raw_abstract: &str, term: &str) -> bool {
    let Some((lead, name)) = lead_and_name(raw_abstract) else {
        return false;
    };

    if !is_upper(&format!("{}{}", lead, name)) {
        return false;
    }

    let norm_abstract = normalize(&strip_html(raw_abstract));
    let norm_abstract = norm_abstract.trim_start();
    let norm_term = normalize(term);
    let norm_term = norm_term.trim();

    if norm_term.is_empty() {
        return false;
    }

    norm_abstract.starts_with(norm_term)
        || without_first_name(norm_abstract, lead)
            .is_some_and(|rest| rest.starts_with(norm_term))
}

/// Run-level switch around [`is_signature_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureFilter {
    enabled: bool,
}

impl SignatureFilter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_signature(&self, result: &SearchResult, term: &str) -> bool {
        self.enabled && is_signature_match(&result.abstract_text, term)
    }

    /// Keeps non-signature results in their original order and returns how
    /// many were discarded.
    pub fn apply(&self, results: Vec<SearchResult>, term: &str) -> (Vec<SearchResult>, usize) {
        if !self.enabled {
            return (results, 0);
        }

        let before = results.len();
        let kept: Vec<SearchResult> = results
            .into_iter()
            .filter(|r| !is_signature_match(&r.abstract_text, term))
            .collect();
        let discarded = before - kept.len();

        (kept, discarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    fn result_with(abstract_text: &str) -> SearchResult {
        SearchResult::new(Section::Secao2, "PORTARIA", "url", abstract_text, "16/10/2026")
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("JOSÉ Antônio Conceição"), "jose antonio conceicao");
    }

    #[test]
    fn test_term_after_first_name_in_highlight() {
        assert!(is_signature_match(
            "<em>JOSÉ ANTONIO</em><em> DE OLIVEIRA MATOS</em>",
            "Antonio de Oliveira"
        ));
    }

    #[test]
    fn test_term_after_lead() {
        assert!(is_signature_match(
            "JOSÉ <span class='highlight' style='background:#FFA;'>ANTONIO DE OLIVEIRA</span> MATOS Diretor",
            "Antonio de Oliveira"
        ));
    }

    #[test]
    fn test_leading_whitespace_before_lead() {
        let abstract_text = "JOSÉ <span class='highlight'>ANTONIO DE OLIVEIRA</span> MATOS";
        assert!(is_signature_match(abstract_text, "Antonio de Oliveira"));
        assert!(is_signature_match(
            &format!("\n{}", abstract_text),
            "Antonio de Oliveira"
        ));
        assert!(is_signature_match(
            &format!("  \t{}", abstract_text),
            "Antonio de Oliveira"
        ));
    }

    #[test]
    fn test_whitespace_only_lead_skips_first_word() {
        assert!(is_signature_match(
            "\n<em>JOSÉ ANTONIO</em><em> DE OLIVEIRA MATOS</em>",
            "Antonio de Oliveira"
        ));
    }

    #[test]
    fn test_term_at_start() {
        assert!(is_signature_match(
            "<span class='highlight'>MARIA SILVA</span> Coordenadora-Geral",
            "maria silva"
        ));
    }

    #[test]
    fn test_mixed_case_is_never_signature() {
        let abstract_text = "<em>Relatório</em><em> anual</em>";
        assert!(!is_signature_match(abstract_text, "Relatório"));
        assert!(!is_signature_match(abstract_text, "anual"));
        assert!(!is_signature_match(abstract_text, "relatorio anual"));
    }

    #[test]
    fn test_no_markup_is_not_signature() {
        assert!(!is_signature_match("MARIA SILVA", "Maria Silva"));
        assert_eq!(lead_and_name("MARIA SILVA"), None);
    }

    #[test]
    fn test_term_elsewhere_in_upper_text() {
        assert!(!is_signature_match(
            "<span>PORTARIA</span> Nº 12 DESIGNA MARIA SILVA",
            "Maria Silva"
        ));
    }

    #[test]
    fn test_filter_disabled_is_identity() {
        let filter = SignatureFilter::new(false);
        let results = vec![
            result_with("<em>MARIA SILVA</em> DIRETORA"),
            result_with("Nomear <em>Maria Silva</em> para o cargo"),
        ];

        let (kept, discarded) = filter.apply(results.clone(), "Maria Silva");
        assert_eq!(kept, results);
        assert_eq!(discarded, 0);
        assert!(!filter.is_signature(&results[0], "Maria Silva"));
    }

    #[test]
    fn test_filter_enabled_drops_signatures_only() {
        let filter = SignatureFilter::new(true);
        let body_match = result_with("Nomear <em>Maria Silva</em> para o cargo");
        let results = vec![result_with("<em>MARIA SILVA</em> DIRETORA"), body_match.clone()];

        let (kept, discarded) = filter.apply(results, "Maria Silva");
        assert_eq!(kept, vec![body_match]);
        assert_eq!(discarded, 1);
    }
}
