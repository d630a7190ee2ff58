// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HISTÓRICO DE CONVERSAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Armazena múltiplas transcrições de conversa com persistência em um único
// arquivo JSON.
//
// Ciclo de vida de uma conversa: criada na primeira mensagem do usuário,
// recebe appends a cada turno, excluída apenas por pedido explícito.
// O roteador nunca toca neste módulo; ele pertence à camada chamadora.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::types::{ChatMessage, Conversation};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Armazém de conversas, em memória com persistência opcional.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: HashMap<String, Conversation>,
    path: Option<PathBuf>,
}

impl ConversationStore {
    /// Cria um armazém vazio, sem persistência.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abre (ou cria) um armazém persistido no caminho dado.
    ///
    /// Arquivo ausente significa armazém vazio; arquivo corrompido é
    /// descartado com aviso em vez de derrubar a aplicação.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let conversations = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(map) => map,
                Err(e) => {
                    log::warn!("Histórico corrompido em {:?}: {}; começando vazio", path, e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            conversations,
            path: Some(path),
        }
    }

    /// Registra uma mensagem, criando a conversa se necessário.
    ///
    /// Uma conversa nova só nasce de uma mensagem do usuário (o título vem
    /// dela); mensagem do bot sem conversa corrente é descartada. Retorna o
    /// id da conversa corrente, se houver.
    pub fn add_message(
        &mut self,
        current_id: Option<&str>,
        content: &str,
        is_user: bool,
    ) -> Option<String> {
        let message = ChatMessage::new(content, is_user);

        if let Some(conversation) = current_id.and_then(|id| self.conversations.get_mut(id)) {
            conversation.messages.push(message);
            return Some(conversation.id.clone());
        }

        if !is_user {
            log::debug!("Mensagem do bot sem conversa corrente; descartada");
            return None;
        }

        let conversation = Conversation::started_by(message);
        let id = conversation.id.clone();
        self.conversations.insert(id.clone(), conversation);
        Some(id)
    }

    /// Busca uma conversa pelo id.
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    /// Exclui uma conversa. Retorna `true` se ela existia.
    pub fn delete(&mut self, id: &str) -> bool {
        self.conversations.remove(id).is_some()
    }

    /// Lista as conversas, mais recente primeiro.
    pub fn list(&self) -> Vec<&Conversation> {
        let mut all: Vec<&Conversation> = self.conversations.values().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Quantidade de conversas armazenadas.
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Verifica se não há conversas.
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Persiste o armazém no arquivo configurado, se houver.
    pub fn save(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.conversations)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        write_atomically(path, &json)
    }
}

/// Escreve via arquivo temporário + rename para não corromper o histórico
/// em caso de interrupção no meio da escrita.
fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}
