// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SESSÃO DE QUESTÕES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Estado transiente de uma única questão pendente de resposta.
//
// Invariante: o slot só fica ocupado entre a emissão de uma questão e uma
// resposta terminal do usuário (letra, "sim", "não" ou entrada não
// reconhecida). Nunca há mais de uma questão ativa; pedir uma nova questão
// com outra ativa simplesmente sobrescreve o slot.
//
// Uma sessão por conversa, passada explicitamente ao roteador — nunca um
// singleton de processo.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::types::Question;
use rand::Rng;

/// Sentinela retornada quando o banco de questões está vazio.
pub const NO_QUESTIONS: &str = "Não há mais questões disponíveis.";

/// Slot opcional com a questão ativa de uma conversa.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    current: Option<Question>,
}

impl QuizSession {
    /// Cria uma sessão sem questão ativa.
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifica se há uma questão aguardando resposta.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Questão ativa, se houver.
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Limpa o slot (transição para Idle).
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Sorteia uma questão do banco e a torna a questão ativa.
    ///
    /// Com o banco vazio retorna [`NO_QUESTIONS`] sem tocar no slot.
    /// Caso contrário escolhe uniformemente, sobrescreve o slot e retorna o
    /// enunciado formatado — a letra correta nunca aparece fora do bloco de
    /// alternativas.
    pub fn draw(&mut self, questions: &[Question]) -> String {
        if questions.is_empty() {
            return NO_QUESTIONS.to_string();
        }
        let index = rand::thread_rng().gen_range(0..questions.len());
        let question = questions[index].clone();
        let prompt = question.prompt.clone();
        self.current = Some(question);
        prompt
    }
}
