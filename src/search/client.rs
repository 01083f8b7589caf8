// file: src/search/client.rs
// description: gazette full-text search capability and its HTTP implementation
// reference: https://www.in.gov.br/consulta/-/buscar/dou

use crate::config::SearchConfig;
use crate::error::{PipelineError, Result};
use crate::models::{Field, SearchDate, SearchResult, Section};
use crate::search::patterns::RESULTS_SCRIPT;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// External full-text search over the gazette.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(
        &self,
        term: &str,
        sections: &[Section],
        date: SearchDate,
        field: Field,
        exact: bool,
    ) -> Result<Vec<SearchResult>>;
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(rename = "jsonArray", default)]
    json_array: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    pub_name: String,
    title: String,
    url_title: String,
    content: String,
    pub_date: String,
}

pub struct DouClient {
    client: Client,
    api_url: String,
    web_url: String,
}

impl DouClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            web_url: config.web_url.clone(),
        })
    }

    fn query_params(
        term: &str,
        sections: &[Section],
        date: SearchDate,
        field: Field,
        exact: bool,
    ) -> Vec<(&'static str, String)> {
        let q = if exact {
            format!("\"{}\"", term)
        } else {
            term.to_string()
        };

        let mut params = vec![
            ("q", q),
            ("exactDate", date.code().to_string()),
            ("sortType", "0".to_string()),
        ];
        params.extend(sections.iter().map(|s| ("s", s.code().to_string())));
        if let Some(code) = field.code() {
            params.push(("currentField", code.to_string()));
        }

        params
    }

    /// Pulls the result list out of the search page.
    pub fn parse_page(&self, html: &str) -> Result<Vec<SearchResult>> {
        let caps = RESULTS_SCRIPT.captures(html).ok_or_else(|| {
            PipelineError::ExternalService("search page has no results script".to_string())
        })?;

        let payload: SearchPayload = serde_json::from_str(caps[1].trim()).map_err(|e| {
            PipelineError::ExternalService(format!("Failed to parse search results: {}", e))
        })?;

        payload
            .json_array
            .into_iter()
            .map(|item| {
                let section = Section::from_code(&item.pub_name).ok_or_else(|| {
                    PipelineError::ExternalService(format!(
                        "unknown section in search result: {}",
                        item.pub_name
                    ))
                })?;

                Ok(SearchResult {
                    section,
                    title: item.title,
                    href: format!("{}{}", self.web_url, item.url_title),
                    abstract_text: item.content,
                    date: item.pub_date,
                })
            })
            .collect()
    }
}

#[async_trait]
impl SearchClient for DouClient {
    async fn search(
        &self,
        term: &str,
        sections: &[Section],
        date: SearchDate,
        field: Field,
        exact: bool,
    ) -> Result<Vec<SearchResult>> {
        let params = Self::query_params(term, sections, date, field, exact);
        debug!("Searching gazette for {:?}", term);

        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                PipelineError::ExternalService(format!("Failed to send search request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(PipelineError::ExternalService(format!(
                "Search request failed with status {}",
                status
            )));
        }

        let body = response.text().await?;
        let results = self.parse_page(&body)?;
        debug!("{} results for {:?}", results.len(), term);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<html><body>
<script id="_br_com_seatecnologia_in_buscadou_BuscaDouPortlet_params" type="application/json">
{"jsonArray": [{"pubName": "DO2", "title": "PORTARIA Nº 10", "urlTitle": "portaria-n-10",
 "content": "Nomear <span class='highlight'>Maria Silva</span> para exercer", "pubDate": "16/10/2026"}]}
</script></body></html>"#;

    fn config(base: &str) -> SearchConfig {
        SearchConfig {
            api_url: format!("{}/consulta/-/buscar/dou", base),
            web_url: "https://www.in.gov.br/web/dou/-/".to_string(),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_query_params() {
        let params = DouClient::query_params(
            "Maria Silva",
            &[Section::Secao1, Section::Secao2],
            SearchDate::Semana,
            Field::Titulo,
            true,
        );

        assert!(params.contains(&("q", "\"Maria Silva\"".to_string())));
        assert!(params.contains(&("exactDate", "semana".to_string())));
        assert!(params.contains(&("s", "do1".to_string())));
        assert!(params.contains(&("s", "do2".to_string())));
        assert!(params.contains(&("currentField", "title_pt_BR".to_string())));
    }

    #[test]
    fn test_parse_page() {
        let client = DouClient::new(&config("http://localhost")).unwrap();
        let results = client.parse_page(PAGE).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].section, Section::Secao2);
        assert_eq!(results[0].href, "https://www.in.gov.br/web/dou/-/portaria-n-10");
        assert_eq!(results[0].date, "16/10/2026");
    }

    #[test]
    fn test_parse_page_without_script() {
        let client = DouClient::new(&config("http://localhost")).unwrap();
        let err = client.parse_page("<html></html>").unwrap_err();
        assert!(err.is_external());
    }

    #[tokio::test]
    async fn test_search_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/consulta/-/buscar/dou"))
            .and(query_param("q", "Maria Silva"))
            .and(query_param("exactDate", "dia"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let client = DouClient::new(&config(&server.uri())).unwrap();
        let results = client
            .search("Maria Silva", &[Section::Todos], SearchDate::Dia, Field::Tudo, false)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "PORTARIA Nº 10");
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = DouClient::new(&config(&server.uri())).unwrap();
        let err = client
            .search("x", &[Section::Todos], SearchDate::Dia, Field::Tudo, true)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::ExternalService(_)));
    }
}
