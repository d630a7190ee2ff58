//! # PilhIA - Núcleo do Chatbot de Eletroquímica
//!
//! Este crate implementa o núcleo do **PilhIA**, um chatbot educacional
//! especializado em eletroquímica (pilhas, baterias, eletrólise e pilha de
//! Daniell) que combina respostas locais determinísticas com um LLM remoto.
//!
//! ## Como funciona?
//!
//! A cada turno o texto do usuário passa por um roteador de intenções que:
//! 1. Reconhece o comando de cálculo de voltagem e responde localmente
//! 2. Conduz a sessão de questões de múltipla escolha (questão → resposta)
//! 3. Delega todo o resto ao LLM, com a base de conhecimento como contexto
//!
//! ## Arquitetura Principal
//!
//! O sistema é composto por 4 pilares:
//!
//! ### 1. Roteador de Intenções (`router`)
//! Máquina de estados de diálogo com prioridade fixa de regras. Os estados
//! (Idle / AwaitingQuizAnswer) são representados pela ocupação da
//! `QuizSession`, passada explicitamente a cada turno.
//!
//! ### 2. Calculadora de Voltagem (`voltage`)
//! Função pura que resolve um par de eletrodos em texto livre contra a
//! tabela de potenciais padrão e calcula E°(cátodo) − E°(ânodo).
//!
//! ### 3. Sessão de Questões (`quiz`)
//! Slot único com a questão ativa, sorteada do banco de questões; a
//! correção da resposta é local, a explicação vem do LLM.
//!
//! ### 4. Gateway LLM (`llm`)
//! Ponto único de contato com a API de chat-completion, com normalização
//! dos formatos heterogêneos de corpo de erro. Nenhuma exceção escapa do
//! gateway: toda falha vira uma string exibível.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use pilhia::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let data = ReferenceData::load(&DataPaths::default()).await;
//!     let llm = Arc::new(OpenRouterClient::new(vec!["sk-...".into()]));
//!     let router = IntentRouter::new(llm);
//!
//!     let mut session = QuizSession::new();
//!     let resposta = router
//!         .process("calcular a voltagem de uma pilha de cobre e zinco", &data, &mut session)
//!         .await;
//!     println!("{}", resposta);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais compartilhados por todo o sistema.
///
/// Define as estruturas de dados básicas:
/// - [`types::Question`]: questão de múltipla escolha formatada
/// - [`types::ChatMessage`]: mensagem da transcrição
/// - [`types::Conversation`]: transcrição de uma conversa
pub mod types;

/// Configuração via variáveis de ambiente.
///
/// - `PILHIA_API_KEYS`: array JSON de chaves da API
/// - `PILHIA_MODEL` / `PILHIA_BASE_URL` / `PILHIA_REFERER`
/// - `PILHIA_TEMPERATURE` / `PILHIA_MAX_TOKENS`
/// - `PILHIA_DATA_DIR`: raiz dos arquivos de dados de referência
pub mod config;

/// Armazenamento de dados de referência.
///
/// Carrega, de JSON estático e de forma concorrente:
/// - a tabela de potenciais padrão (ordem de inserção preservada)
/// - o banco de questões (máx. 10, malformadas descartadas)
/// - a base de conhecimento (limitada para o contexto do LLM)
///
/// Falha de carga degrada para estrutura vazia, nunca derruba o sistema.
pub mod data;

/// Calculadora de voltagem de pilha.
///
/// Mapeia "cobre e zinco" para a voltagem da pilha correspondente usando
/// correspondência por substring contra a tabela de potenciais. Sempre
/// retorna uma string legível, nunca erra.
pub mod voltage;

/// Sessão de questões de múltipla escolha.
///
/// Slot opcional com a questão ativa de uma conversa e o sorteio de
/// questões do banco.
pub mod quiz;

/// Prompts do chatbot.
///
/// O prompt de sistema fixo da PilhIA e os construtores dos prompts de
/// explicação e de consulta geral, com limites de tamanho.
pub mod prompts;

/// Roteador de intenções (máquina de estados de diálogo).
///
/// O coração do sistema. Contém:
/// - `IntentRouter`: classifica cada enunciado e produz a resposta do turno
/// - `RouterRules`: frases-gatilho como dados de configuração
pub mod router;

/// Gateway para o modelo de linguagem.
///
/// Define a trait `LlmClient` e implementações:
/// - `OpenRouterClient`: API de chat-completion compatível com OpenRouter
/// - `MockLlmClient`: mock para testes
///
/// Responsável pela normalização dos formatos de erro da API.
pub mod llm;

/// Histórico de conversas.
///
/// Múltiplas transcrições com persistência em arquivo JSON; camada do
/// chamador, nunca consultada pelo roteador.
pub mod history;

// Re-exports principais
pub use config::{load_data_paths, load_llm_config, DataPaths, LlmConfig};
pub use data::ReferenceData;
pub use llm::{LlmClient, LlmError, OpenRouterClient};
pub use quiz::QuizSession;
pub use router::{IntentRouter, RouterRules};

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// Importar tudo de uma vez:
/// ```rust,ignore
/// use pilhia::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{DataPaths, LlmConfig};
    pub use crate::data::{PotentialTable, ReferenceData};
    pub use crate::history::ConversationStore;
    pub use crate::llm::{CompletionOptions, LlmClient, LlmError, MockLlmClient, OpenRouterClient};
    pub use crate::quiz::QuizSession;
    pub use crate::router::{IntentRouter, RouterRules};
    pub use crate::types::*;
}
