// file: src/search/patterns.rs
// description: compiled regex patterns for gazette markup handling
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref HTML_TAG: Regex = Regex::new(r"(?s)<.*?>").expect("HTML_TAG regex is valid");

    // Text before the first tag, then the text between the first and second tag.
    pub static ref LEAD_AND_NAME: Regex = Regex::new(
        r"(?s)^(.*?)<[^>]+>(.*?)<[^>]+>"
    ).expect("LEAD_AND_NAME regex is valid");

    pub static ref RESULTS_SCRIPT: Regex = Regex::new(
        r#"(?s)<script[^>]*id=["']_br_com_seatecnologia_in_buscadou_BuscaDouPortlet_params["'][^>]*>(.*?)</script>"#
    ).expect("RESULTS_SCRIPT regex is valid");
}

pub fn strip_html(raw_html: &str) -> String {
    HTML_TAG.replace_all(raw_html, "").into_owned()
}
