// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GATEWAY LLM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Ponto único de contato com o serviço de modelo de linguagem.
//
// Define a trait LlmClient e duas implementações:
// - OpenRouterClient: chamada HTTP de chat-completion com normalização dos
//   vários formatos de corpo de erro da API
// - MockLlmClient: respostas enfileiradas para testes
//
// Nenhuma exceção escapa deste módulo para o roteador: toda falha vira um
// LlmError, e LlmError::to_user_message produz a string exibível.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limite do texto cru usado como fallback quando o corpo de erro não é JSON.
const RAW_ERROR_CAP: usize = 500;

/// Sentinela quando a resposta vem sem conteúdo.
pub const NO_ANSWER: &str = "Sem resposta da IA.";

/// Timeout das chamadas HTTP ao serviço de LLM.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Erros do gateway LLM.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// Nenhuma credencial configurada; a chamada nem é tentada.
    #[error("Nenhuma chave da API configurada")]
    MissingApiKey,

    /// Resposta HTTP de erro, com mensagem extraída do corpo.
    #[error("Erro na API (Status: {status}): {message}")]
    Api {
        /// Código de status HTTP.
        status: u16,
        /// Mensagem legível extraída do corpo de erro.
        message: String,
    },

    /// Falha de transporte (rede, timeout).
    #[error("Erro de rede: {0}")]
    Network(String),

    /// Corpo de resposta de sucesso que não pôde ser interpretado.
    #[error("Formato de resposta inválido: {0}")]
    Parse(String),
}

impl LlmError {
    /// Converte o erro na string exibida ao usuário.
    ///
    /// A interface conversacional não tem canal de erro separado; a falha é
    /// a própria resposta.
    pub fn to_user_message(&self) -> String {
        match self {
            LlmError::MissingApiKey => {
                "⚠️ Erro: Nenhuma chave da API configurada. A IA não está disponível.".to_string()
            }
            other => format!("⚠️ Erro na comunicação com a IA: {}.", other),
        }
    }
}

/// Parâmetros de geração enviados em cada chamada.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Identificador do modelo.
    pub model: String,
    /// Temperatura de amostragem.
    pub temperature: f32,
    /// Máximo de tokens da resposta.
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: "meta-llama/llama-3.2-3b-instruct:free".to_string(),
            temperature: 0.5,
            max_tokens: 1500,
        }
    }
}

/// Trait principal para clientes LLM.
///
/// O roteador só conhece esta interface, o que permite trocar o provedor
/// real por um mock nos testes.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Envia um prompt com o prompt de sistema dado e retorna o texto da
    /// primeira completion.
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, LlmError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CORPO DA REQUISIÇÃO / RESPOSTA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Extrai uma mensagem legível de um corpo de erro da API.
///
/// A API retorna erros em formatos heterogêneos; tentamos, nesta ordem:
/// `message`, `error` como string, `error.message`, `detail`. Se o corpo
/// não for JSON, usa o texto cru limitado a [`RAW_ERROR_CAP`] caracteres.
pub fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            if let Some(msg) = value.get("message").and_then(|v| v.as_str()) {
                msg.to_string()
            } else if let Some(msg) = value.get("error").and_then(|v| v.as_str()) {
                msg.to_string()
            } else if let Some(msg) = value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|v| v.as_str())
            {
                msg.to_string()
            } else if let Some(msg) = value.get("detail").and_then(|v| v.as_str()) {
                msg.to_string()
            } else {
                value.to_string()
            }
        }
        Err(_) => body.chars().take(RAW_ERROR_CAP).collect(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO OPENROUTER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente para uma API de chat-completion compatível com OpenRouter.
///
/// Mantém um pool de chaves e sorteia uma a cada chamada. As chaves vêm da
/// configuração injetada — nunca de constantes no código.
pub struct OpenRouterClient {
    api_keys: Vec<String>,
    base_url: String,
    referer: Option<String>,
    options: CompletionOptions,
    client: reqwest::Client,
}

impl OpenRouterClient {
    /// Cria um cliente com o pool de chaves dado e parâmetros padrão.
    pub fn new(api_keys: Vec<String>) -> Self {
        Self {
            api_keys,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            referer: None,
            options: CompletionOptions::default(),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Substitui a URL base (útil para testes e proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Define o cabeçalho `HTTP-Referer` exigido pelo OpenRouter.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Substitui os parâmetros de geração.
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// Sorteia uma chave do pool.
    fn pick_key(&self) -> Result<&str, LlmError> {
        self.api_keys
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .ok_or(LlmError::MissingApiKey)
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, LlmError> {
        let api_key = self.pick_key()?;

        let body = ChatRequest {
            model: &self.options.model,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatRequestMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut request = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body);
        if let Some(referer) = &self.referer {
            request = request
                .header("HTTP-Referer", referer)
                .header("X-Title", "PilhIA");
        }

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| LlmError::Network(e.to_string()))?;
            log::warn!("API retornou status {}: {}", status, text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente mock com respostas enfileiradas.
///
/// Grava cada par (prompt, system_prompt) recebido para inspeção nos testes.
/// Com a fila vazia, responde com um texto fixo.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<String, LlmError>>>,
    calls: std::sync::Mutex<Vec<(String, String)>>,
}

impl MockLlmClient {
    /// Cria um mock sem respostas enfileiradas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enfileira uma resposta de sucesso.
    pub fn push_response(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Enfileira uma falha.
    pub fn push_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Pares (prompt, system_prompt) recebidos até agora.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str, system_prompt: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_prompt.to_string()));

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Resposta simulada.".to_string()))
    }
}
