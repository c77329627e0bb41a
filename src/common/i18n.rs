// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;

pub const IDIOMA_PADRAO: &str = "pt";

// Arquivos de tradução embutidos no binário (locales/*.json)
const ARQUIVOS: [(&str, &str); 2] = [
    ("pt", include_str!("../../locales/pt.json")),
    ("en", include_str!("../../locales/en.json")),
];

/// Catálogo de mensagens por idioma. Chaves ausentes caem no português
/// e, por último, na própria chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    mensagens: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn carregar() -> anyhow::Result<Self> {
        let mut mensagens = HashMap::new();

        for (idioma, conteudo) in ARQUIVOS {
            let tabela: HashMap<String, String> = serde_json::from_str(conteudo)
                .with_context(|| format!("Arquivo de traduções inválido: {}", idioma))?;
            mensagens.insert(idioma.to_string(), tabela);
        }

        Ok(Self {
            mensagens: Arc::new(mensagens),
        })
    }

    pub fn traduzir(&self, idioma: &str, chave: &str, params: &[(&str, &str)]) -> String {
        let texto = self
            .mensagens
            .get(idioma)
            .and_then(|tabela| tabela.get(chave))
            .or_else(|| {
                self.mensagens
                    .get(IDIOMA_PADRAO)
                    .and_then(|tabela| tabela.get(chave))
            })
            .cloned()
            .unwrap_or_else(|| chave.to_string());

        // "{nome}" -> valor
        params.iter().fold(texto, |acc, (nome, valor)| {
            acc.replace(&format!("{{{}}}", nome), valor)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traduz_no_idioma_pedido() {
        let store = I18nStore::carregar().unwrap();
        assert_eq!(
            store.traduzir("en", "erros.moto_nao_encontrada", &[]),
            "Motorcycle not found."
        );
        assert_eq!(
            store.traduzir("pt", "erros.moto_nao_encontrada", &[]),
            "Moto não encontrada."
        );
    }

    #[test]
    fn test_idioma_desconhecido_cai_no_portugues() {
        let store = I18nStore::carregar().unwrap();
        assert_eq!(
            store.traduzir("fr", "erros.moto_pausada", &[]),
            "A produção desta moto está pausada."
        );
    }

    #[test]
    fn test_chave_desconhecida_devolve_a_chave() {
        let store = I18nStore::carregar().unwrap();
        assert_eq!(store.traduzir("pt", "nao.existe", &[]), "nao.existe");
    }

    #[test]
    fn test_substitui_parametros() {
        let store = I18nStore::carregar().unwrap();
        let texto = store.traduzir(
            "pt",
            "erros.transicao_invalida",
            &[("de", "estoque"), ("para", "em_producao")],
        );
        assert_eq!(
            texto,
            "A moto está em 'estoque' e não pode ir para 'em_producao'."
        );
    }

    #[test]
    fn test_arquivos_tem_as_mesmas_chaves() {
        let store = I18nStore::carregar().unwrap();
        let pt = &store.mensagens["pt"];
        let en = &store.mensagens["en"];
        for chave in pt.keys() {
            assert!(en.contains_key(chave), "chave sem tradução em inglês: {}", chave);
        }
        assert_eq!(pt.len(), en.len());
    }
}
