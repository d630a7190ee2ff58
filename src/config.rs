// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Configuração via variáveis de ambiente (carregáveis de um .env):
//
// - PILHIA_API_KEYS: array JSON de chaves da API ("[\"sk-...\", ...]")
// - PILHIA_MODEL: modelo de chat-completion
// - PILHIA_BASE_URL: URL base da API
// - PILHIA_REFERER: valor do cabeçalho HTTP-Referer (opcional)
// - PILHIA_TEMPERATURE / PILHIA_MAX_TOKENS: parâmetros de geração
// - PILHIA_DATA_DIR: diretório raiz dos dados de referência
//
// As credenciais vêm sempre do ambiente, nunca de constantes no código.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::llm::CompletionOptions;
use std::path::{Path, PathBuf};

/// Caminhos dos três arquivos de dados de referência.
#[derive(Debug, Clone)]
pub struct DataPaths {
    /// Tabela de potenciais padrão.
    pub potentials: PathBuf,
    /// Banco de questões.
    pub questions: PathBuf,
    /// Base de conhecimento.
    pub knowledge_base: PathBuf,
}

impl DataPaths {
    /// Monta os caminhos a partir de um diretório raiz, com o layout
    /// padrão dos dados da PilhIA.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            potentials: dir.join("tabelas/tabela_potenciais.json"),
            questions: dir.join("questoes/eletroquimica.json"),
            knowledge_base: dir.join("basededados/eletroquimica.json"),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::from_dir("data")
    }
}

/// Configuração do gateway LLM.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Pool de chaves da API; uma é sorteada por chamada.
    pub api_keys: Vec<String>,
    /// URL base da API de chat-completion.
    pub base_url: String,
    /// Cabeçalho HTTP-Referer, se exigido pelo provedor.
    pub referer: Option<String>,
    /// Parâmetros de geração.
    pub options: CompletionOptions,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            referer: None,
            options: CompletionOptions::default(),
        }
    }
}

/// Interpreta o array JSON de chaves da API.
///
/// Valor que não é um array JSON de strings resulta em pool vazio (logado),
/// nunca em erro: a ausência de chave degrada para a mensagem fixa de
/// indisponibilidade da IA.
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .filter(|k| !k.is_empty())
            .collect(),
        Ok(_) => {
            log::error!("PILHIA_API_KEYS não é um array JSON válido; usando pool vazio");
            Vec::new()
        }
        Err(e) => {
            log::error!("Erro ao parsear PILHIA_API_KEYS: {}; usando pool vazio", e);
            Vec::new()
        }
    }
}

/// Carrega a configuração do LLM das variáveis de ambiente.
pub fn load_llm_config() -> LlmConfig {
    let mut config = LlmConfig::default();

    if let Ok(raw) = std::env::var("PILHIA_API_KEYS") {
        config.api_keys = parse_api_keys(&raw);
        log::info!("{} chave(s) da API carregada(s)", config.api_keys.len());
    }

    if let Ok(model) = std::env::var("PILHIA_MODEL") {
        if !model.trim().is_empty() {
            config.options.model = model;
            log::info!("PILHIA_MODEL={}", config.options.model);
        }
    }

    if let Ok(base_url) = std::env::var("PILHIA_BASE_URL") {
        if !base_url.trim().is_empty() {
            config.base_url = base_url;
            log::info!("PILHIA_BASE_URL={}", config.base_url);
        }
    }

    if let Ok(referer) = std::env::var("PILHIA_REFERER") {
        if !referer.trim().is_empty() {
            config.referer = Some(referer);
        }
    }

    if let Ok(raw) = std::env::var("PILHIA_TEMPERATURE") {
        if let Ok(temperature) = raw.parse::<f32>() {
            if (0.0..=2.0).contains(&temperature) {
                config.options.temperature = temperature;
                log::info!("PILHIA_TEMPERATURE={}", temperature);
            }
        }
    }

    if let Ok(raw) = std::env::var("PILHIA_MAX_TOKENS") {
        if let Ok(max_tokens) = raw.parse::<u32>() {
            if max_tokens > 0 {
                config.options.max_tokens = max_tokens;
                log::info!("PILHIA_MAX_TOKENS={}", max_tokens);
            }
        }
    }

    config
}

/// Carrega os caminhos de dados das variáveis de ambiente.
pub fn load_data_paths() -> DataPaths {
    match std::env::var("PILHIA_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            log::info!("PILHIA_DATA_DIR={}", dir);
            DataPaths::from_dir(dir)
        }
        _ => DataPaths::default(),
    }
}
