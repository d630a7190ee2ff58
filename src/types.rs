// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS FUNDAMENTAIS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Estruturas de dados compartilhadas por todo o sistema:
// - Question: questão de múltipla escolha do banco de questões
// - ChatMessage: uma mensagem da transcrição (usuário ou bot)
// - Conversation: transcrição ordenada de uma conversa
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tamanho máximo do título derivado da primeira mensagem do usuário.
pub const MAX_TITLE_LEN: usize = 30;

/// Questão de múltipla escolha pronta para exibição.
///
/// O texto em `prompt` já vem formatado com as alternativas embutidas
/// (`(A) ...`, `(B) ...`). A letra correta é guardada em minúscula para
/// comparação case-insensitive com a resposta do usuário.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Enunciado formatado, alternativas incluídas.
    pub prompt: String,
    /// Alternativas por letra (a, b, c, d).
    pub alternatives: BTreeMap<String, String>,
    /// Letra da alternativa correta, em minúscula.
    pub correct_answer: String,
}

impl Question {
    /// Verifica se a letra dada corresponde à resposta correta.
    ///
    /// Comparação case-insensitive: `"B"` acerta uma questão cuja
    /// resposta é `"b"`.
    pub fn is_correct(&self, letter: &str) -> bool {
        letter.trim().to_lowercase() == self.correct_answer
    }
}

/// Uma mensagem da transcrição de conversa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Conteúdo textual da mensagem.
    pub content: String,
    /// `true` se a mensagem é do usuário, `false` se é do bot.
    pub is_user: bool,
    /// Momento em que a mensagem foi registrada.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Cria uma mensagem com timestamp atual.
    pub fn new(content: impl Into<String>, is_user: bool) -> Self {
        Self {
            content: content.into(),
            is_user,
            timestamp: Utc::now(),
        }
    }
}

/// Transcrição de uma conversa.
///
/// Ciclo de vida: criada na primeira mensagem do usuário, recebe appends a
/// cada turno e só desaparece por exclusão explícita.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Identificador único da conversa.
    pub id: String,
    /// Título exibido na listagem (primeira mensagem, truncada).
    pub title: String,
    /// Mensagens em ordem de chegada.
    pub messages: Vec<ChatMessage>,
    /// Momento de criação.
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Cria uma conversa nova a partir da primeira mensagem do usuário.
    pub fn started_by(first_message: ChatMessage) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: derive_title(&first_message.content),
            messages: vec![first_message],
            created_at: Utc::now(),
        }
    }
}

/// Deriva o título de uma conversa da sua primeira mensagem.
///
/// Trunca em [`MAX_TITLE_LEN`] caracteres com reticências.
pub fn derive_title(content: &str) -> String {
    if content.chars().count() > MAX_TITLE_LEN {
        let head: String = content.chars().take(MAX_TITLE_LEN).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_correct_case_insensitive() {
        let q = Question {
            prompt: "Qual é o cátodo?".into(),
            alternatives: BTreeMap::new(),
            correct_answer: "b".into(),
        };

        assert!(q.is_correct("b"));
        assert!(q.is_correct("B"));
        assert!(q.is_correct(" b "));
        assert!(!q.is_correct("a"));
    }

    #[test]
    fn test_derive_title_short() {
        assert_eq!(derive_title("Oi"), "Oi");
    }

    #[test]
    fn test_derive_title_truncates() {
        let long = "Explique o funcionamento da pilha de Daniell em detalhes";
        let title = derive_title(long);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), MAX_TITLE_LEN + 3);
    }

    #[test]
    fn test_conversation_started_by() {
        let msg = ChatMessage::new("Primeira pergunta", true);
        let conv = Conversation::started_by(msg);
        assert_eq!(conv.title, "Primeira pergunta");
        assert_eq!(conv.messages.len(), 1);
        assert!(conv.messages[0].is_user);
    }
}
