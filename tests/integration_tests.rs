//! # Testes de Integração
//!
//! Este módulo contém testes de integração que validam o fluxo completo do sistema:
//! - Dados → Roteador: JSON de referência parseado alimenta o roteamento
//! - Diálogo de questões: questão → resposta → explicação → sim/não
//! - Gateway: falhas da API viram a resposta do turno, nunca erro propagado
//! - Histórico: a transcrição de um diálogo inteiro é persistida e relida

use pilhia::data::{parse_knowledge_base, parse_potentials, parse_questions, ReferenceData};
use pilhia::history::ConversationStore;
use pilhia::llm::{LlmError, MockLlmClient};
use pilhia::quiz::{QuizSession, NO_QUESTIONS};
use pilhia::router::IntentRouter;
use std::sync::Arc;

const POTENTIALS_JSON: &str = r#"[
    {"metal": "Cobre", "potencial": 0.34},
    {"metal": "Zinco", "potencial": -0.76},
    {"metal": "Prata", "potencial": 0.80},
    {"metal": "Magnésio", "potencial": -2.37}
]"#;

const QUESTIONS_JSON: &str = r#"[
    {
        "questao": "Na pilha de Daniell, qual eletrodo sofre oxidação?",
        "alternativas": {"a": "O cobre", "b": "O zinco", "c": "A prata", "d": "O grafite"},
        "resposta_correta": "b"
    }
]"#;

const KNOWLEDGE_JSON: &str = r#"[
    {
        "topico": "Pilha de Daniell",
        "conteudo": "Célula galvânica com eletrodos de zinco e cobre.",
        "palavras_chave": ["pilha", "daniell", "zinco", "cobre"]
    }
]"#;

fn load_reference_data() -> ReferenceData {
    ReferenceData {
        potentials: parse_potentials(POTENTIALS_JSON).unwrap(),
        questions: parse_questions(QUESTIONS_JSON).unwrap(),
        knowledge_base: parse_knowledge_base("eletroquimica.json", KNOWLEDGE_JSON).unwrap(),
    }
}

fn router_with_mock() -> (IntentRouter, Arc<MockLlmClient>) {
    let mock = Arc::new(MockLlmClient::new());
    let router = IntentRouter::new(mock.clone());
    (router, mock)
}

// ============================================================================
// TESTE 1: Dados → Voltagem
// Verifica o caminho completo do JSON de potenciais até a resposta do turno
// ============================================================================

#[tokio::test]
async fn test_voltage_end_to_end() {
    let data = load_reference_data();
    let (router, mock) = router_with_mock();
    let mut session = QuizSession::new();

    let response = router
        .process(
            "Quero calcular a voltagem de uma pilha de cobre e zinco, por favor",
            &data,
            &mut session,
        )
        .await;

    assert_eq!(
        response,
        "A voltagem da pilha com Cobre e Zinco é de 1.10 V."
    );
    // Resposta local: o LLM nunca é consultado.
    assert!(mock.calls().is_empty());

    // A ordem dos eletrodos no enunciado não muda o resultado.
    let swapped = router
        .process(
            "calcular a voltagem de uma pilha de zinco e cobre",
            &data,
            &mut session,
        )
        .await;
    assert!(swapped.contains("1.10 V"));

    println!("✅ test_voltage_end_to_end PASSED");
}

// ============================================================================
// TESTE 2: Diálogo de questões completo
// questão → letra errada → explicação → "sim" → nova questão → "não" → fim
// ============================================================================

#[tokio::test]
async fn test_full_quiz_dialogue() {
    let data = load_reference_data();
    let (router, mock) = router_with_mock();
    mock.push_response("O zinco é oxidado por ter menor potencial de redução.");
    let mut session = QuizSession::new();

    // 1. Pedido de questão abre a sessão
    let question = router.process("gerar questões", &data, &mut session).await;
    assert!(question.contains("qual eletrodo sofre oxidação?"));
    assert!(question.contains("(A) O cobre"));
    assert!(session.is_active());

    // 2. Letra errada: veredito + gabarito + explicação do LLM
    let verdict = router.process("a", &data, &mut session).await;
    assert!(verdict.starts_with("Você errou. A resposta correta é (B)."));
    assert!(verdict.contains("O zinco é oxidado"));
    assert!(verdict.contains("Deseja fazer outra questão? (sim/não)"));
    assert!(session.is_active());

    // 3. "sim" sorteia outra questão (banco de uma só: a mesma volta)
    let again = router.process("sim", &data, &mut session).await;
    assert!(again.contains("qual eletrodo sofre oxidação?"));
    assert!(session.is_active());

    // 4. "não" encerra a sessão
    let done = router.process("não", &data, &mut session).await;
    assert_eq!(done, "Ótimo. Deseja mais alguma coisa?");
    assert!(!session.is_active());

    println!("✅ test_full_quiz_dialogue PASSED");
}

// ============================================================================
// TESTE 3: Prioridade do comando de voltagem
// O comando vence mesmo com questão em andamento e limpa a sessão
// ============================================================================

#[tokio::test]
async fn test_voltage_preempts_quiz() {
    let data = load_reference_data();
    let (router, _) = router_with_mock();
    let mut session = QuizSession::new();

    router.process("questão", &data, &mut session).await;
    assert!(session.is_active());

    let response = router
        .process(
            "calcular a voltagem de uma pilha de prata e magnésio",
            &data,
            &mut session,
        )
        .await;

    // 0.80 − (−2.37) = 3.17
    assert_eq!(
        response,
        "A voltagem da pilha com Prata e Magnésio é de 3.17 V."
    );
    assert!(!session.is_active());

    println!("✅ test_voltage_preempts_quiz PASSED");
}

// ============================================================================
// TESTE 4: Consulta geral carrega o contexto da base de conhecimento
// ============================================================================

#[tokio::test]
async fn test_general_query_includes_knowledge_context() {
    let data = load_reference_data();
    let (router, mock) = router_with_mock();
    mock.push_response("A pilha de Daniell usa zinco e cobre.");
    let mut session = QuizSession::new();

    let response = router
        .process("o que é a pilha de Daniell?", &data, &mut session)
        .await;

    assert_eq!(response, "A pilha de Daniell usa zinco e cobre.");

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    let (prompt, system) = &calls[0];
    assert!(prompt.starts_with("Contexto: "));
    assert!(prompt.contains("Célula galvânica com eletrodos de zinco e cobre."));
    assert!(prompt.contains("Pergunta: o que é a pilha de Daniell?"));
    assert!(system.contains("PilhIA"));

    println!("✅ test_general_query_includes_knowledge_context PASSED");
}

// ============================================================================
// TESTE 5: Falha do gateway vira a resposta do turno
// ============================================================================

#[tokio::test]
async fn test_gateway_failure_is_surfaced_not_propagated() {
    let data = load_reference_data();
    let (router, mock) = router_with_mock();
    mock.push_error(LlmError::Api {
        status: 429,
        message: "Rate limit exceeded".to_string(),
    });
    let mut session = QuizSession::new();

    let response = router
        .process("explique eletrólise", &data, &mut session)
        .await;

    assert!(response.starts_with("⚠️ Erro na comunicação com a IA"));
    assert!(response.contains("Status: 429"));
    assert!(response.contains("Rate limit exceeded"));

    println!("✅ test_gateway_failure_is_surfaced_not_propagated PASSED");
}

// ============================================================================
// TESTE 6: Sem chave configurada, o resto do sistema continua funcionando
// ============================================================================

#[tokio::test]
async fn test_missing_api_key_degrades_gracefully() {
    let data = load_reference_data();
    let (router, mock) = router_with_mock();
    mock.push_error(LlmError::MissingApiKey);
    let mut session = QuizSession::new();

    let response = router.process("oi, tudo bem?", &data, &mut session).await;
    assert_eq!(
        response,
        "⚠️ Erro: Nenhuma chave da API configurada. A IA não está disponível."
    );

    // Voltagem e questões são locais e independem do gateway.
    let voltage = router
        .process(
            "calcular a voltagem de uma pilha de cobre e zinco",
            &data,
            &mut session,
        )
        .await;
    assert!(voltage.contains("1.10 V"));

    let question = router.process("questões enem", &data, &mut session).await;
    assert_ne!(question, NO_QUESTIONS);
    assert!(session.is_active());

    println!("✅ test_missing_api_key_degrades_gracefully PASSED");
}

// ============================================================================
// TESTE 7: Transcrição de um diálogo inteiro persistida e relida
// ============================================================================

#[tokio::test]
async fn test_dialogue_transcript_round_trip() {
    let data = load_reference_data();
    let (router, _) = router_with_mock();
    let mut session = QuizSession::new();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pilhia-chats.json");
    let mut store = ConversationStore::open(&path);
    let mut current_id: Option<String> = None;

    for input in [
        "calcular a voltagem de uma pilha de cobre e zinco",
        "gerar questões",
        "b",
    ] {
        current_id = store.add_message(current_id.as_deref(), input, true);
        let reply = router.process(input, &data, &mut session).await;
        current_id = store.add_message(current_id.as_deref(), &reply, false);
    }
    store.save().unwrap();

    let reopened = ConversationStore::open(&path);
    assert_eq!(reopened.len(), 1);

    let conversation = reopened.get(current_id.as_deref().unwrap()).unwrap();
    assert_eq!(conversation.title, "calcular a voltagem de uma pil...");
    assert_eq!(conversation.messages.len(), 6);
    assert!(conversation.messages[1].content.contains("1.10 V"));
    assert!(conversation.messages[5]
        .content
        .starts_with("Você acertou!"));

    println!("✅ test_dialogue_transcript_round_trip PASSED");
}
