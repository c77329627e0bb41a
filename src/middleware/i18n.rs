// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::IDIOMA_PADRAO;

// Idioma do pedido, tirado do Accept-Language ("pt-BR" -> "pt")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(IDIOMA_PADRAO.to_string())
    }
}

impl Locale {
    pub fn from_header(valor: Option<&str>) -> Self {
        valor
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first()
                    .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
            })
            .filter(|idioma| !idioma.is_empty() && idioma != "*")
            .map(Locale)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let valor = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok());

        Ok(Locale::from_header(valor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_sem_header_usa_portugues() {
        assert_eq!(Locale::from_header(None), Locale("pt".into()));
    }

    #[test]
    fn test_pega_o_idioma_de_maior_peso() {
        assert_eq!(Locale::from_header(Some("en-US,en;q=0.9,pt;q=0.5")), Locale("en".into()));
        assert_eq!(Locale::from_header(Some("pt;q=0.4, en-GB;q=0.8")), Locale("en".into()));
    }

    #[tokio::test]
    async fn test_extrator_le_accept_language() {
        let (mut parts, _) = Request::builder()
            .header(header::ACCEPT_LANGUAGE, "pt-BR")
            .body(())
            .unwrap()
            .into_parts();

        let locale = Locale::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(locale.0, "pt");
    }
}
