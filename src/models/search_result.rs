// file: src/models/search_result.rs
// description: gazette search result model and search parameter enumerations
// reference: in.gov.br "buscar/dou" query parameters

use serde::{Deserialize, Serialize};

/// Part of the gazette a publication belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "do1")]
    Secao1,
    #[serde(rename = "do2")]
    Secao2,
    #[serde(rename = "do3")]
    Secao3,
    #[serde(rename = "doe")]
    EdicaoExtra,
    #[serde(rename = "do1a")]
    EdicaoSuplementar,
    #[serde(rename = "todos")]
    Todos,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Secao1,
        Section::Secao2,
        Section::Secao3,
        Section::EdicaoExtra,
        Section::EdicaoSuplementar,
        Section::Todos,
    ];

    /// Name used in job definitions.
    pub fn name(&self) -> &'static str {
        match self {
            Section::Secao1 => "SECAO_1",
            Section::Secao2 => "SECAO_2",
            Section::Secao3 => "SECAO_3",
            Section::EdicaoExtra => "EDICAO_EXTRA",
            Section::EdicaoSuplementar => "EDICAO_SUPLEMENTAR",
            Section::Todos => "TODOS",
        }
    }

    /// Code sent to and returned by the search service.
    pub fn code(&self) -> &'static str {
        match self {
            Section::Secao1 => "do1",
            Section::Secao2 => "do2",
            Section::Secao3 => "do3",
            Section::EdicaoExtra => "doe",
            Section::EdicaoSuplementar => "do1a",
            Section::Todos => "todos",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Section::Secao1 => "Seção 1",
            Section::Secao2 => "Seção 2",
            Section::Secao3 => "Seção 3",
            Section::EdicaoExtra => "Edição Extra",
            Section::EdicaoSuplementar => "Edição Suplementar",
            Section::Todos => "Todas",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Case-insensitive; extra editions of each section (`do1e`, `do2e`,
    /// `do3e`) are reported as `EdicaoExtra`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        match code.as_str() {
            "do1e" | "do2e" | "do3e" => Some(Section::EdicaoExtra),
            other => Self::ALL.into_iter().find(|s| s.code() == other),
        }
    }
}

/// Publication date window searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchDate {
    Dia,
    Semana,
    Mes,
    Ano,
}

impl SearchDate {
    pub fn name(&self) -> &'static str {
        match self {
            SearchDate::Dia => "DIA",
            SearchDate::Semana => "SEMANA",
            SearchDate::Mes => "MES",
            SearchDate::Ano => "ANO",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SearchDate::Dia => "dia",
            SearchDate::Semana => "semana",
            SearchDate::Mes => "mes",
            SearchDate::Ano => "ano",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            SearchDate::Dia,
            SearchDate::Semana,
            SearchDate::Mes,
            SearchDate::Ano,
        ]
        .into_iter()
        .find(|d| d.name() == name)
    }
}

/// Document field the term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Tudo,
    Titulo,
    Conteudo,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Tudo => "TUDO",
            Field::Titulo => "TITULO",
            Field::Conteudo => "CONTEUDO",
        }
    }

    /// `None` means no field restriction.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Field::Tudo => None,
            Field::Titulo => Some("title_pt_BR"),
            Field::Conteudo => Some("ddm__text__21040__texto_pt_BR"),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [Field::Tudo, Field::Titulo, Field::Conteudo]
            .into_iter()
            .find(|f| f.name() == name)
    }
}

/// One matched publication. `abstract_text` holds the raw highlighted
/// excerpt as returned by the service, markup included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub section: Section,
    pub title: String,
    pub href: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub date: String,
}

impl SearchResult {
    pub fn new(
        section: Section,
        title: impl Into<String>,
        href: impl Into<String>,
        abstract_text: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            section,
            title: title.into(),
            href: href.into(),
            abstract_text: abstract_text.into(),
            date: date.into(),
        }
    }

    pub fn section_description(&self) -> &'static str {
        self.section.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_names_and_codes() {
        assert_eq!(Section::from_name("SECAO_1"), Some(Section::Secao1));
        assert_eq!(Section::from_name("secao_1"), None);
        assert_eq!(Section::from_code("DO2"), Some(Section::Secao2));
        assert_eq!(Section::from_code("do1a"), Some(Section::EdicaoSuplementar));
        assert_eq!(Section::from_code("do3e"), Some(Section::EdicaoExtra));
        assert_eq!(Section::from_code("xyz"), None);
    }

    #[test]
    fn test_field_code() {
        assert_eq!(Field::Tudo.code(), None);
        assert_eq!(Field::from_name("TITULO"), Some(Field::Titulo));
        assert_eq!(SearchDate::from_name("SEMANA").map(|d| d.code()), Some("semana"));
    }

    #[test]
    fn test_search_result_serializes_abstract_key() {
        let result = SearchResult::new(
            Section::Secao1,
            "PORTARIA Nº 1",
            "https://www.in.gov.br/web/dou/-/portaria-1",
            "<span>MARIA</span> SILVA",
            "16/10/2026",
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["section"], "do1");
        assert_eq!(json["abstract"], "<span>MARIA</span> SILVA");
        assert_eq!(result.section_description(), "Seção 1");
    }
}
