// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ROTEADOR DE INTENÇÕES (MÁQUINA DE ESTADOS DE DIÁLOGO)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Classifica cada enunciado do usuário contra o estado da sessão e uma
// prioridade fixa de regras, produzindo ou uma resposta local determinística
// ou um prompt despachado ao gateway LLM.
//
// Estados: Idle e AwaitingQuizAnswer, representados inteiramente pela
// ocupação do slot da QuizSession. Este é o único componente que lê ou
// escreve a sessão; persistência e interface ficam com o chamador.
//
// O roteador nunca propaga erro: falha do gateway vira a string de resposta.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::data::ReferenceData;
use crate::llm::LlmClient;
use crate::prompts;
use crate::quiz::{QuizSession, NO_QUESTIONS};
use crate::voltage::calculate_voltage;
use std::sync::Arc;

/// Frases-gatilho do roteador, como dados de configuração.
///
/// Variações de localização ou de produto trocam esta tabela, não o código
/// dos ramos.
#[derive(Debug, Clone)]
pub struct RouterRules {
    /// Frase que dispara o comando de voltagem.
    pub voltage_trigger: String,
    /// Marcador após o qual vêm os eletrodos.
    pub voltage_marker: String,
    /// Frases que disparam um pedido de questão.
    pub quiz_triggers: Vec<String>,
    /// Letras aceitas como resposta de alternativa.
    pub answer_letters: Vec<String>,
}

impl Default for RouterRules {
    fn default() -> Self {
        Self {
            voltage_trigger: "calcular a voltagem de uma pilha de".to_string(),
            voltage_marker: "de uma pilha de".to_string(),
            quiz_triggers: vec![
                "gerar questões".to_string(),
                "questões enem".to_string(),
                "questão".to_string(),
            ],
            answer_letters: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
                "e".to_string(),
            ],
        }
    }
}

/// Roteador de intenções da PilhIA.
///
/// Imutável após a construção; a sessão de questões é recebida por `&mut`
/// a cada turno, permitindo múltiplas conversas concorrentes com o mesmo
/// roteador.
pub struct IntentRouter {
    rules: RouterRules,
    llm: Arc<dyn LlmClient>,
}

impl IntentRouter {
    /// Cria um roteador com as regras padrão.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            rules: RouterRules::default(),
            llm,
        }
    }

    /// Cria um roteador com regras customizadas.
    pub fn with_rules(llm: Arc<dyn LlmClient>, rules: RouterRules) -> Self {
        Self { rules, llm }
    }

    /// Processa um enunciado do usuário e produz a resposta do turno.
    ///
    /// Ordem estrita de prioridade:
    /// 1. Comando de voltagem — vence mesmo com questão ativa e limpa a
    ///    sessão.
    /// 2. Sessão ativa — sub-despacho em "sim" / "não" / letra /
    ///    qualquer outra coisa (que cancela a questão e cai na consulta
    ///    geral).
    /// 3. Frases-gatilho de questão, com a sessão vazia.
    /// 4. Consulta geral ao LLM com o contexto da base de conhecimento.
    pub async fn process(
        &self,
        input: &str,
        data: &ReferenceData,
        session: &mut QuizSession,
    ) -> String {
        let normalized = input.trim().to_lowercase();

        // Regra 1: comando de voltagem tem prioridade sobre tudo.
        if normalized.contains(&self.rules.voltage_trigger) {
            let electrodes = normalized
                .splitn(2, &self.rules.voltage_marker)
                .nth(1)
                .unwrap_or("")
                .trim();
            session.clear();
            log::debug!("Intenção: cálculo de voltagem ({:?})", electrodes);
            return calculate_voltage(electrodes, &data.potentials);
        }

        // Regra 2: questão em andamento.
        if let Some(question) = session.current().cloned() {
            return match normalized.as_str() {
                "sim" => {
                    let response = session.draw(&data.questions);
                    if response == NO_QUESTIONS {
                        session.clear();
                    }
                    response
                }
                "não" => {
                    session.clear();
                    "Ótimo. Deseja mais alguma coisa?".to_string()
                }
                letter if self.rules.answer_letters.iter().any(|l| l == letter) => {
                    // A sessão permanece ativa durante o turno de
                    // explicação; só "sim"/"não" a encerram depois.
                    let prompt = prompts::explanation_prompt(&question);
                    let explanation = match self
                        .llm
                        .complete(&prompt, prompts::SYSTEM_PROMPT)
                        .await
                    {
                        Ok(text) => text,
                        Err(e) => e.to_user_message(),
                    };

                    let verdict = if question.is_correct(letter) {
                        "Você acertou!"
                    } else {
                        "Você errou."
                    };
                    format!(
                        "{} A resposta correta é ({}).\n{}\nDeseja fazer outra questão? (sim/não)",
                        verdict,
                        question.correct_answer.to_uppercase(),
                        explanation
                    )
                }
                _ => {
                    // Entrada não reconhecida cancela a questão em jogo.
                    session.clear();
                    self.general_query(input, data).await
                }
            };
        }

        // Regra 3: pedido de questão.
        if self
            .rules
            .quiz_triggers
            .iter()
            .any(|trigger| normalized.contains(trigger))
        {
            log::debug!("Intenção: pedido de questão");
            return session.draw(&data.questions);
        }

        // Regra 4: consulta geral.
        self.general_query(input, data).await
    }

    /// Despacha uma consulta geral ao LLM com o contexto da base.
    async fn general_query(&self, input: &str, data: &ReferenceData) -> String {
        let prompt = prompts::general_prompt(&data.knowledge_base, input);
        match self.llm.complete(&prompt, prompts::SYSTEM_PROMPT).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Falha na consulta ao LLM: {}", e);
                e.to_user_message()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_questions, PotentialTable};
    use crate::llm::MockLlmClient;

    fn test_data() -> ReferenceData {
        let mut potentials = PotentialTable::new();
        potentials.insert("cobre", 0.34);
        potentials.insert("zinco", -0.76);

        let questions = parse_questions(
            r#"[{
                "questao": "O que ocorre no cátodo?",
                "alternativas": {"a": "Oxidação", "b": "Redução"},
                "resposta_correta": "b"
            }]"#,
        )
        .unwrap();

        ReferenceData {
            potentials,
            questions,
            knowledge_base: "Tópico: Pilha de Daniell\nConteúdo: Zn e Cu\n".to_string(),
        }
    }

    fn router_with_mock() -> (IntentRouter, Arc<MockLlmClient>) {
        let mock = Arc::new(MockLlmClient::new());
        let router = IntentRouter::new(mock.clone());
        (router, mock)
    }

    #[tokio::test]
    async fn test_voltage_command() {
        let (router, _) = router_with_mock();
        let data = test_data();
        let mut session = QuizSession::new();

        let response = router
            .process(
                "Calcular a voltagem de uma pilha de cobre e zinco",
                &data,
                &mut session,
            )
            .await;

        assert_eq!(
            response,
            "A voltagem da pilha com Cobre e Zinco é de 1.10 V."
        );
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_voltage_command_preempts_active_quiz() {
        let (router, _) = router_with_mock();
        let data = test_data();
        let mut session = QuizSession::new();
        session.draw(&data.questions);
        assert!(session.is_active());

        let response = router
            .process(
                "calcular a voltagem de uma pilha de cobre e zinco",
                &data,
                &mut session,
            )
            .await;

        assert!(response.contains("1.10 V"));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_quiz_trigger_starts_session() {
        let (router, _) = router_with_mock();
        let data = test_data();
        let mut session = QuizSession::new();

        let response = router.process("gerar questões", &data, &mut session).await;

        assert!(response.contains("O que ocorre no cátodo?"));
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn test_quiz_trigger_with_empty_bank() {
        let (router, _) = router_with_mock();
        let mut data = test_data();
        data.questions.clear();
        let mut session = QuizSession::new();

        let response = router.process("questão", &data, &mut session).await;
        assert_eq!(response, NO_QUESTIONS);
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_wrong_letter_answer_keeps_session() {
        let (router, mock) = router_with_mock();
        mock.push_response("A redução ocorre no cátodo.");
        let data = test_data();
        let mut session = QuizSession::new();
        session.draw(&data.questions);

        let response = router.process("a", &data, &mut session).await;

        assert!(response.starts_with("Você errou. A resposta correta é (B)."));
        assert!(response.contains("A redução ocorre no cátodo."));
        assert!(response.contains("Deseja fazer outra questão? (sim/não)"));
        // A sessão só é limpa por um "sim"/"não" posterior.
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn test_correct_letter_answer_framing() {
        let (router, mock) = router_with_mock();
        mock.push_response("Justificativa.");
        let data = test_data();
        let mut session = QuizSession::new();
        session.draw(&data.questions);

        let response = router.process("B", &data, &mut session).await;
        assert!(response.starts_with("Você acertou! A resposta correta é (B)."));
    }

    #[tokio::test]
    async fn test_explanation_prompt_sent_to_llm() {
        let (router, mock) = router_with_mock();
        mock.push_response("ok");
        let data = test_data();
        let mut session = QuizSession::new();
        session.draw(&data.questions);

        router.process("b", &data, &mut session).await;

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("A alternativa correta é '(B)'"));
        assert!(calls[0].1.contains("PilhIA"));
    }

    #[tokio::test]
    async fn test_nao_clears_session_with_acknowledgement() {
        let (router, _) = router_with_mock();
        let data = test_data();
        let mut session = QuizSession::new();
        session.draw(&data.questions);

        let response = router.process("não", &data, &mut session).await;
        assert_eq!(response, "Ótimo. Deseja mais alguma coisa?");
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_sim_draws_new_question() {
        let (router, _) = router_with_mock();
        let data = test_data();
        let mut session = QuizSession::new();
        session.draw(&data.questions);

        let response = router.process("sim", &data, &mut session).await;
        assert!(response.contains("O que ocorre no cátodo?"));
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn test_unrecognized_input_cancels_quiz_and_goes_general() {
        let (router, mock) = router_with_mock();
        mock.push_response("A eletrólise é um processo forçado.");
        let data = test_data();
        let mut session = QuizSession::new();
        session.draw(&data.questions);

        let response = router
            .process("o que é eletrólise?", &data, &mut session)
            .await;

        assert_eq!(response, "A eletrólise é um processo forçado.");
        assert!(!session.is_active());

        let calls = mock.calls();
        assert!(calls[0].0.starts_with("Contexto: "));
        assert!(calls[0].0.contains("Pergunta: o que é eletrólise?"));
    }

    #[tokio::test]
    async fn test_gateway_failure_becomes_response_string() {
        let (router, mock) = router_with_mock();
        mock.push_error(crate::llm::LlmError::Api {
            status: 429,
            message: "rate limited".to_string(),
        });
        let data = test_data();
        let mut session = QuizSession::new();

        let response = router
            .process("explique a pilha de Daniell", &data, &mut session)
            .await;

        assert!(response.contains("429"));
        assert!(response.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_general_query_with_empty_knowledge_base_still_works() {
        let (router, mock) = router_with_mock();
        mock.push_response("Não sei responder isso");
        let mut data = test_data();
        data.knowledge_base.clear();
        let mut session = QuizSession::new();

        let response = router.process("qualquer coisa", &data, &mut session).await;
        assert_eq!(response, "Não sei responder isso");
    }
}
