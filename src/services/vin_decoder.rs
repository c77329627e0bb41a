// src/services/vin_decoder.rs
//
// Chassi (VIN) -> nome do modelo.
// Busca exata do VDS na tabela e, se não achar, monta um rótulo aproximado
// a partir da família (par de letras), cilindrada (dígitos) e versão (letras finais).

use serde::Serialize;
use utoipa::ToSchema;

pub const MODELO_DESCONHECIDO: &str = "DESCONHECIDO";

const TAMANHO_VIN: usize = 17;
const TAMANHO_VDS: usize = 6;
const INICIO_VDS: usize = 3;

// Código do ano-modelo (posição 10 do VIN), ciclo 2010-2039
const CODIGOS_ANO: &str = "ABCDEFGHJKLMNPRSTVWXY123456789";
const PRIMEIRO_ANO: i32 = 2010;

// VDS conhecidos
const TABELA_VDS: &[(&str, &str)] = &[
    ("KC2100", "CG 160 Titan"),
    ("KC2110", "CG 160 Fan"),
    ("KC2120", "CG 160 Start"),
    ("KC2130", "CG 160 Cargo"),
    ("JC7510", "Biz 125"),
    ("JC7520", "Biz 125 ES"),
    ("JF8310", "Pop 110i"),
    ("MD4110", "NXR 160 Bros"),
    ("MD4120", "NXR 160 Bros ESDD"),
    ("MC4110", "XRE 190"),
    ("MC4310", "XRE 300"),
    ("PC5110", "CB 250F Twister"),
    ("NC5110", "CB 500F"),
    ("NC5120", "CB 500X"),
    ("ND0910", "PCX 160"),
    ("ND1010", "ADV 160"),
    ("RC6110", "Elite 125"),
    ("SC7510", "Sahara 300"),
];

// Par de letras -> família do produto
const FAMILIAS: &[(&str, &str)] = &[
    ("KC", "CG"),
    ("JC", "Biz"),
    ("JF", "Pop"),
    ("MD", "Bros"),
    ("MC", "XRE"),
    ("PC", "CB"),
    ("NC", "CB"),
    ("ND", "PCX"),
    ("RC", "Elite"),
    ("SC", "Sahara"),
];

// Letra após a cilindrada -> versão
const SUFIXOS: &[(char, &str)] = &[
    ('T', "Titan"),
    ('F', "Fan"),
    ('S', "Start"),
    ('C', "Cargo"),
    ('E', "ES"),
    ('X', "X"),
    ('R', "Rally"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrigemModelo {
    Tabela,
    Heuristica,
    Desconhecido,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModeloDecodificado {
    /// Código normalizado (maiúsculo, só letras e números)
    #[schema(example = "9C2KC2100RR000123")]
    pub codigo: String,
    #[schema(example = "KC2100")]
    pub vds: Option<String>,
    #[schema(example = "CG 160 Titan")]
    pub modelo: String,
    pub origem: OrigemModelo,
    #[schema(example = 2024)]
    pub ano_modelo: Option<i32>,
}

/// Função total: qualquer entrada produz um resultado, no pior caso `DESCONHECIDO`.
pub fn decodificar(codigo: &str) -> ModeloDecodificado {
    let normalizado: String = codigo
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalizado.len() < TAMANHO_VDS {
        return ModeloDecodificado {
            codigo: normalizado,
            vds: None,
            modelo: MODELO_DESCONHECIDO.to_string(),
            origem: OrigemModelo::Desconhecido,
            ano_modelo: None,
        };
    }

    let ano_modelo = if normalizado.len() == TAMANHO_VIN {
        ano_do_vin(&normalizado)
    } else {
        None
    };

    let vds = extrair_vds(&normalizado).to_string();

    let (modelo, origem) = match buscar_tabela(&vds) {
        Some(modelo) => (modelo.to_string(), OrigemModelo::Tabela),
        None => match rotulo_heuristico(&vds) {
            Some(rotulo) => (rotulo, OrigemModelo::Heuristica),
            None => (MODELO_DESCONHECIDO.to_string(), OrigemModelo::Desconhecido),
        },
    };

    ModeloDecodificado {
        codigo: normalizado,
        vds: Some(vds),
        modelo,
        origem,
        ano_modelo,
    }
}

// `codigo` já normalizado (ASCII), então fatiar por byte é seguro.
fn extrair_vds(codigo: &str) -> &str {
    if codigo.len() == TAMANHO_VIN {
        return &codigo[INICIO_VDS..INICIO_VDS + TAMANHO_VDS];
    }

    // Código parcial (leitura truncada, etiqueta): qualquer janela conhecida serve
    if let Some(janela) = janelas(codigo).find(|j| buscar_tabela(j).is_some()) {
        return janela;
    }

    if codigo.len() >= INICIO_VDS + TAMANHO_VDS {
        &codigo[INICIO_VDS..INICIO_VDS + TAMANHO_VDS]
    } else {
        &codigo[..TAMANHO_VDS]
    }
}

fn janelas(codigo: &str) -> impl Iterator<Item = &str> {
    (0..=codigo.len() - TAMANHO_VDS).map(move |i| &codigo[i..i + TAMANHO_VDS])
}

fn buscar_tabela(vds: &str) -> Option<&'static str> {
    TABELA_VDS
        .iter()
        .find(|(codigo, _)| *codigo == vds)
        .map(|(_, modelo)| *modelo)
}

fn familia(vds: &str) -> Option<&'static str> {
    let procurar = |par: &str| {
        FAMILIAS
            .iter()
            .find(|(letras, _)| *letras == par)
            .map(|(_, familia)| *familia)
    };

    // Prefixo primeiro, depois qualquer par dentro do VDS
    procurar(&vds[..2]).or_else(|| (1..vds.len() - 1).find_map(|i| procurar(&vds[i..i + 2])))
}

// Primeira sequência com pelo menos dois dígitos: (início, fim)
fn sequencia_de_digitos(vds: &str) -> Option<(usize, usize)> {
    let bytes = vds.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let inicio = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i - inicio >= 2 {
            return Some((inicio, i));
        }
    }
    None
}

fn cilindrada(digitos: &str) -> Option<u32> {
    let valor = match digitos.len() {
        0 | 1 => return None,
        2 => digitos.parse::<u32>().ok()? * 10,
        _ => digitos[..3].parse::<u32>().ok()?,
    };
    (50..=1300).contains(&valor).then_some(valor)
}

fn rotulo_heuristico(vds: &str) -> Option<String> {
    let familia = familia(vds)?;

    let (cc, resto) = match sequencia_de_digitos(vds) {
        Some((inicio, fim)) => (cilindrada(&vds[inicio..fim]), &vds[fim..]),
        None => (None, ""),
    };

    let versao = resto
        .chars()
        .find_map(|c| SUFIXOS.iter().find(|(letra, _)| *letra == c).map(|(_, v)| *v));

    let partes: Vec<String> = [
        Some(familia.to_string()),
        cc.map(|c| c.to_string()),
        versao.map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect();

    Some(partes.join(" "))
}

fn ano_do_vin(vin: &str) -> Option<i32> {
    let codigo = vin.chars().nth(9)?;
    CODIGOS_ANO
        .find(codigo)
        .map(|posicao| PRIMEIRO_ANO + posicao as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vin_com(vds: &str) -> String {
        format!("9C2{}RR000001", vds)
    }

    #[test]
    fn test_todos_os_vds_conhecidos() {
        for (vds, modelo) in TABELA_VDS {
            let resultado = decodificar(&vin_com(vds));
            assert_eq!(resultado.modelo, *modelo, "vds {}", vds);
            assert_eq!(resultado.origem, OrigemModelo::Tabela);
            assert_eq!(resultado.vds.as_deref(), Some(*vds));
        }
    }

    #[test]
    fn test_normaliza_entrada() {
        assert_eq!(decodificar(" 9c2-kc2100-rr000123 ").modelo, "CG 160 Titan");
    }

    #[test]
    fn test_heuristica_monta_rotulo_com_familia() {
        let resultado = decodificar("9C2KC160FRR000001");
        assert_eq!(resultado.origem, OrigemModelo::Heuristica);
        assert_eq!(resultado.modelo, "CG 160 Fan");
    }

    #[test]
    fn test_heuristica_dois_digitos_e_familia_no_meio() {
        // VDS "9MD15X": família no meio, "9" isolado não conta como cilindrada
        let resultado = decodificar("9C29MD15XRR000001");
        assert_eq!(resultado.vds.as_deref(), Some("9MD15X"));
        assert_eq!(resultado.modelo, "Bros 150 X");
    }

    #[test]
    fn test_heuristica_sem_cilindrada_valida() {
        // "040" fica abaixo de 50cc e é descartado
        let resultado = decodificar(&vin_com("SC0400"));
        assert_eq!(resultado.origem, OrigemModelo::Heuristica);
        assert!(resultado.modelo.contains("Sahara"));
        assert_eq!(resultado.modelo, "Sahara");
    }

    #[test]
    fn test_sem_familia_e_desconhecido() {
        let resultado = decodificar(&vin_com("ZZ9999"));
        assert_eq!(resultado.modelo, MODELO_DESCONHECIDO);
        assert_eq!(resultado.origem, OrigemModelo::Desconhecido);
    }

    #[test]
    fn test_codigo_curto_e_desconhecido() {
        assert_eq!(decodificar("9C2K").modelo, MODELO_DESCONHECIDO);
        assert_eq!(decodificar("").modelo, MODELO_DESCONHECIDO);
        assert_eq!(decodificar("---").vds, None);
    }

    #[test]
    fn test_codigo_parcial_acha_janela_conhecida() {
        assert_eq!(decodificar("KC2100").modelo, "CG 160 Titan");
        assert_eq!(decodificar("XXND0910YY").modelo, "PCX 160");
    }

    #[test]
    fn test_codigo_parcial_sem_janela_usa_posicao_padrao() {
        // 10 caracteres: VDS a partir da 4ª posição
        let resultado = decodificar("ABCMD16XYZ");
        assert_eq!(resultado.vds.as_deref(), Some("MD16XY"));
        assert_eq!(resultado.modelo, "Bros 160 X");
        assert_eq!(resultado.ano_modelo, None);
    }

    #[test]
    fn test_ano_modelo() {
        assert_eq!(decodificar("9C2KC2100RR000123").ano_modelo, Some(2024));
        assert_eq!(decodificar("9C2KC2100AR000123").ano_modelo, Some(2010));
        assert_eq!(decodificar("9C2KC21001R000123").ano_modelo, Some(2031));
        // 'U' não é usado como código de ano
        assert_eq!(decodificar("9C2KC2100UR000123").ano_modelo, None);
    }

    #[test]
    fn test_deterministico() {
        let a = decodificar("9C2MC999ZRR000001");
        let b = decodificar("9C2MC999ZRR000001");
        assert_eq!(a, b);
    }
}
