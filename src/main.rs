// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PILHIA CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Chat interativo no terminal com o núcleo do PilhIA.
//
// Uso:
//   pilhia-cli
//
// Comandos dentro do chat:
//   novo          inicia uma nova conversa
//   sair / exit   encerra o programa
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use pilhia::history::ConversationStore;
use pilhia::prelude::*;
use pilhia::{load_data_paths, load_llm_config};
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [
        PathBuf::from(".env"),
        PathBuf::from("../.env"),
        {
            let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            p.push(".env");
            p
        },
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!(
                        "✓ Carregado .env de: {:?}",
                        path.canonicalize().unwrap_or(path.clone())
                    );
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    if dotenvy::dotenv().is_ok() {
        eprintln!("✓ Carregado .env do diretório atual");
    } else {
        eprintln!(
            "⚠ Nenhum arquivo .env encontrado. Sem PILHIA_API_KEYS a IA fica indisponível, \
             mas o cálculo de voltagem e as questões continuam funcionando."
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    // Inicializar logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" PILHIA v{}", pilhia::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Assistente de eletroquímica. Experimente:");
    println!("  calcular a voltagem de uma pilha de cobre e zinco");
    println!("  gerar questões");
    println!();
    println!("Comandos: 'novo' (nova conversa), 'sair' ou 'exit' (encerrar)");
    println!();

    // Dados de referência carregados ANTES de aceitar entrada
    let paths = load_data_paths();
    let data = ReferenceData::load(&paths).await;
    log::info!(
        "Dados carregados: {} potenciais, {} questões, {} chars de base de conhecimento",
        data.potentials.len(),
        data.questions.len(),
        data.knowledge_base.len()
    );

    let llm_config = load_llm_config();
    let mut client = OpenRouterClient::new(llm_config.api_keys)
        .with_base_url(llm_config.base_url)
        .with_options(llm_config.options);
    if let Some(referer) = llm_config.referer {
        client = client.with_referer(referer);
    }

    let router = IntentRouter::new(Arc::new(client));
    let mut session = QuizSession::new();

    let history_path = std::env::var("PILHIA_HISTORY")
        .unwrap_or_else(|_| "pilhia-chats.json".to_string());
    let mut store = ConversationStore::open(&history_path);
    let mut current_id: Option<String> = None;

    let stdin = std::io::stdin();
    loop {
        print!("você> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("sair") || input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input.eq_ignore_ascii_case("novo") {
            current_id = None;
            session.clear();
            println!("(nova conversa)");
            continue;
        }

        current_id = store.add_message(current_id.as_deref(), input, true);

        let reply = router.process(input, &data, &mut session).await;
        println!("PilhIA> {}", reply);
        println!();

        current_id = store.add_message(current_id.as_deref(), &reply, false);
        if let Err(e) = store.save() {
            log::warn!("Falha ao salvar histórico: {}", e);
        }
    }

    println!("Até a próxima!");
    Ok(())
}
