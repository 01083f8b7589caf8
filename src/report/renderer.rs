// file: src/report/renderer.rs
// description: HTML report document and flat export rows for a grouped report
// reference: gazette search result page markup

use crate::models::{GroupedReport, ReportRow};

pub const ROW_HEADER: [&str; 6] = ["Term", "Section", "URL", "Title", "Abstract", "Date"];
pub const GROUP_HEADER: &str = "Group";

const STYLE: &str = r#"<style>
    .grupo { border-top: 2px solid #1351b4; margin-top: 24px; }
    .grupo-label { color: #1351b4; font-family: 'rawline',sans-serif; font-size: 22px; font-weight: bold; }
    .resultado { border-bottom: 1px solid #707070; padding: 20px 0; }
    .search-total-label { font-size: 15px; margin: 0; padding: 0; }
    .secao-marker { color: #06acff; font-family: 'rawline',sans-serif; font-size: 18px; font-weight: bold; margin-bottom: 8px; }
    .title-marker { font-family: 'rawline',sans-serif; font-size: 20px; font-weight: bold; line-height: 26px; margin-bottom: 8px; margin-top: 0; }
    .title-marker a { color: #222; margin: 0; text-decoration: none; text-transform: uppercase; }
    .abstract-marker { font-size: 18px; font-weight: 500; line-height: 22px; margin-bottom: 5px; margin-top: 0; }
    .date-marker { color: #b1b1b1; font-family: 'rawline', sans-serif; font-size: 14px; font-weight: 500; margin-top: 0; }
</style>
"#;

/// Escapes text placed into HTML content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replaces every non-ASCII character with a numeric entity so the
/// document survives transports that mangle encodings.
pub fn encode_non_ascii(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    for c in html.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(&format!("&#{};", u32::from(c)));
        }
    }
    out
}

/// Group block per labelled group, a `.resultado` block per term and one
/// entry per result. Abstracts keep their highlight markup.
pub fn render_html(report: &GroupedReport) -> String {
    let mut content = String::from(STYLE);

    for group in report.groups() {
        if let Some(label) = &group.label {
            content.push_str(&format!(
                "<div class='grupo'>\n<p class='grupo-label'>{}</p>\n",
                escape_html(label)
            ));
        }

        for entry in &group.terms {
            let count = entry.results.len();
            content.push_str(&format!(
                "<div class='resultado'>\n<p class='search-total-label'>{} result{} for <b>{}</b></p>\n",
                count,
                if count == 1 { "" } else { "s" },
                escape_html(&entry.term)
            ));

            for item in &entry.results {
                content.push_str(&format!(
                    "<br>\n<p class='secao-marker'>{}</p>\n<h5 class='title-marker'><a href='{}'>{}</a></h5>\n<p class='abstract-marker'>{}</p>\n<p class='date-marker'>{}</p>\n",
                    item.section_description(),
                    escape_html(&item.href),
                    escape_html(&item.title),
                    item.abstract_text,
                    escape_html(&item.date)
                ));
            }

            content.push_str("</div>\n");
        }

        if group.label.is_some() {
            content.push_str("</div>\n");
        }
    }

    encode_non_ascii(&content)
}

/// One row per result, in report order.
pub fn rows(report: &GroupedReport) -> Vec<ReportRow> {
    report
        .groups()
        .iter()
        .flat_map(|group| {
            group.terms.iter().flat_map(move |entry| {
                entry.results.iter().map(move |item| ReportRow {
                    group: group.label.clone(),
                    term: entry.term.clone(),
                    section: item.section_description().to_string(),
                    url: item.href.clone(),
                    title: item.title.clone(),
                    abstract_text: item.abstract_text.clone(),
                    date: item.date.clone(),
                })
            })
        })
        .collect()
}

/// Header for the export; the group column only exists for grouped reports.
pub fn header(grouped: bool) -> Vec<&'static str> {
    let mut columns = Vec::with_capacity(ROW_HEADER.len() + 1);
    if grouped {
        columns.push(GROUP_HEADER);
    }
    columns.extend(ROW_HEADER);
    columns
}

pub fn row_values(row: &ReportRow, grouped: bool) -> Vec<&str> {
    let mut values = Vec::with_capacity(ROW_HEADER.len() + 1);
    if grouped {
        values.push(row.group.as_deref().unwrap_or(""));
    }
    values.extend([
        row.term.as_str(),
        row.section.as_str(),
        row.url.as_str(),
        row.title.as_str(),
        row.abstract_text.as_str(),
        row.date.as_str(),
    ]);
    values
}
