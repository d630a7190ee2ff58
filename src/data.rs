// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ARMAZENAMENTO DE DADOS DE REFERÊNCIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Carrega as três estruturas imutáveis-após-carga do chatbot:
// - Tabela de potenciais padrão (metal → volts)
// - Banco de questões de múltipla escolha (máx. 10)
// - Base de conhecimento textual (limitada para o contexto do LLM)
//
// Os parsers são separados do I/O para serem testáveis sobre literais.
// Falha de carga nunca é fatal: loga e degrada para estrutura vazia.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::config::DataPaths;
use crate::prompts::truncate_chars;
use crate::types::Question;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Máximo de questões mantidas do banco.
pub const MAX_QUESTIONS: usize = 10;

/// Máximo de alternativas embutidas no texto formatado de uma questão.
pub const MAX_ALTERNATIVES: usize = 4;

/// Limite de caracteres por arquivo da base de conhecimento.
pub const KNOWLEDGE_FILE_CAP: usize = 7500;

/// Limite final de caracteres da base de conhecimento.
pub const KNOWLEDGE_CAP: usize = 8000;

/// Tabela de potenciais padrão de eletrodos.
///
/// Preserva a ordem de inserção: a busca por substring varre as entradas na
/// ordem em que foram carregadas e a primeira que contém o token vence. Isso
/// torna o desempate reproduzível entre execuções (estratégia documentada,
/// não acidente de iteração de mapa).
#[derive(Debug, Clone, Default)]
pub struct PotentialTable {
    entries: Vec<(String, f64)>,
}

impl PotentialTable {
    /// Cria uma tabela vazia.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere um eletrodo com seu potencial padrão.
    ///
    /// O nome é normalizado para minúsculas. Nome repetido atualiza o valor
    /// mantendo a posição original.
    pub fn insert(&mut self, metal: impl Into<String>, volts: f64) {
        let key = metal.into().to_lowercase();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = volts;
        } else {
            self.entries.push((key, volts));
        }
    }

    /// Busca o potencial de um token por inclusão de substring.
    ///
    /// Retorna a primeira entrada (em ordem de carga) cujo nome contém o
    /// token. Correspondência parcial deliberada: "cobre" encontra
    /// "cobre (Cu2+/Cu)".
    pub fn lookup(&self, token: &str) -> Option<(&str, f64)> {
        self.entries
            .iter()
            .find(|(key, _)| key.contains(token))
            .map(|(key, volts)| (key.as_str(), *volts))
    }

    /// Quantidade de eletrodos na tabela.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Verifica se a tabela está vazia.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct PotentialRecord {
    metal: Option<String>,
    potencial: Option<f64>,
}

/// Converte o JSON da tabela de potenciais em [`PotentialTable`].
///
/// Entradas sem `metal` ou sem `potencial` são descartadas em silêncio.
pub fn parse_potentials(json: &str) -> Result<PotentialTable, serde_json::Error> {
    let records: Vec<PotentialRecord> = serde_json::from_str(json)?;
    let mut table = PotentialTable::new();
    for record in records {
        if let (Some(metal), Some(volts)) = (record.metal, record.potencial) {
            table.insert(metal, volts);
        }
    }
    Ok(table)
}

/// Formata uma questão crua no texto de exibição.
///
/// Embute até [`MAX_ALTERNATIVES`] alternativas como `(A) texto`. A letra da
/// resposta correta é normalizada para minúscula.
fn format_question(
    questao: &str,
    alternativas: &BTreeMap<String, String>,
    resposta_correta: &str,
) -> Question {
    let mut prompt = format!("{}\n", questao);
    for (letter, option) in alternativas.iter().take(MAX_ALTERNATIVES) {
        prompt.push_str(&format!("({}) {}\n", letter.to_uppercase(), option));
    }
    Question {
        prompt,
        alternatives: alternativas.clone(),
        correct_answer: resposta_correta.to_lowercase(),
    }
}

fn question_from_value(value: &Value) -> Option<Question> {
    let questao = value.get("questao")?.as_str()?;
    let alternativas = value.get("alternativas")?.as_object()?;
    let resposta = value.get("resposta_correta")?.as_str()?;

    let map: BTreeMap<String, String> = alternativas
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect();

    Some(format_question(questao, &map, resposta))
}

/// Converte o JSON do banco de questões em uma lista de [`Question`].
///
/// Aceita um array ou um objeto único (banco de uma questão só). Mantém no
/// máximo as [`MAX_QUESTIONS`] primeiras entradas bem formadas; as demais
/// são descartadas em silêncio.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    let questions = match &value {
        Value::Array(items) => items
            .iter()
            .take(MAX_QUESTIONS)
            .filter_map(question_from_value)
            .collect(),
        Value::Object(_) => question_from_value(&value).into_iter().collect(),
        _ => Vec::new(),
    };
    Ok(questions)
}

/// Achata o JSON da base de conhecimento em texto corrido.
///
/// Arrays de `{topico, conteudo, palavras_chave}` viram blocos separados por
/// `---`; qualquer outro JSON vira sua serialização indentada. O texto é
/// tratado como blob inerte, nunca interpretado pelo roteador.
pub fn flatten_knowledge(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let mut block = String::new();
                if let Some(topico) = item.get("topico").and_then(Value::as_str) {
                    block.push_str(&format!("Tópico: {}\n", topico));
                }
                if let Some(conteudo) = item.get("conteudo").and_then(Value::as_str) {
                    block.push_str(&format!("Conteúdo: {}\n", conteudo));
                }
                if let Some(palavras) = item.get("palavras_chave").and_then(Value::as_array) {
                    let joined: Vec<&str> =
                        palavras.iter().filter_map(Value::as_str).collect();
                    if !joined.is_empty() {
                        block.push_str(&format!("Palavras-chave: {}\n", joined.join(", ")));
                    }
                }
                block
            })
            .collect::<Vec<_>>()
            .join("\n---\n"),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

/// Monta a base de conhecimento a partir do JSON cru de um arquivo.
///
/// Aplica os dois limites de tamanho: fatia por arquivo e teto
/// final, ambos para respeitar o orçamento de contexto do LLM.
pub fn parse_knowledge_base(source_name: &str, json: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    let flattened = flatten_knowledge(&value);
    let content = format!(
        "\n--- Conteúdo de {} ---\n{}\n",
        source_name,
        truncate_chars(&flattened, KNOWLEDGE_FILE_CAP)
    );
    Ok(truncate_chars(&content, KNOWLEDGE_CAP).to_string())
}

/// Dados de referência prontos para o roteador.
///
/// Somente leitura após a carga; o roteador recebe `&ReferenceData`.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Tabela de potenciais padrão.
    pub potentials: PotentialTable,
    /// Banco de questões formatadas.
    pub questions: Vec<Question>,
    /// Base de conhecimento achatada e limitada.
    pub knowledge_base: String,
}

impl ReferenceData {
    /// Carrega as três fontes concorrentemente.
    ///
    /// As cargas são independentes entre si; o `join!` garante que o
    /// roteador só é usado depois que as três terminam. Falhas individuais
    /// degradam a respectiva estrutura para vazia.
    pub async fn load(paths: &DataPaths) -> Self {
        let (potentials, questions, knowledge_base) = tokio::join!(
            load_potentials(&paths.potentials),
            load_questions(&paths.questions),
            load_knowledge_base(&paths.knowledge_base),
        );
        Self {
            potentials,
            questions,
            knowledge_base,
        }
    }
}

/// Carrega a tabela de potenciais de um arquivo JSON.
///
/// Falha de leitura ou parse resulta em tabela vazia, nunca em erro.
pub async fn load_potentials(path: &Path) -> PotentialTable {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => match parse_potentials(&text) {
            Ok(table) => {
                log::info!("Tabela de potenciais carregada ({} eletrodos)", table.len());
                table
            }
            Err(e) => {
                log::warn!("Erro ao parsear tabela de potenciais {:?}: {}", path, e);
                PotentialTable::new()
            }
        },
        Err(e) => {
            log::warn!("Erro ao carregar tabela de potenciais {:?}: {}", path, e);
            PotentialTable::new()
        }
    }
}

/// Carrega o banco de questões de um arquivo JSON.
pub async fn load_questions(path: &Path) -> Vec<Question> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => match parse_questions(&text) {
            Ok(questions) => {
                log::info!("{} questões carregadas", questions.len());
                questions
            }
            Err(e) => {
                log::warn!("Erro ao parsear banco de questões {:?}: {}", path, e);
                Vec::new()
            }
        },
        Err(e) => {
            log::warn!("Erro ao carregar banco de questões {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Carrega a base de conhecimento de um arquivo JSON.
pub async fn load_knowledge_base(path: &Path) -> String {
    let source_name = path.display().to_string();
    match tokio::fs::read_to_string(path).await {
        Ok(text) => match parse_knowledge_base(&source_name, &text) {
            Ok(content) => {
                log::info!(
                    "Base de conhecimento carregada ({} caracteres)",
                    content.chars().count()
                );
                content
            }
            Err(e) => {
                log::warn!("Erro ao parsear base de conhecimento {:?}: {}", path, e);
                String::new()
            }
        },
        Err(e) => {
            log::warn!("Erro ao carregar base de conhecimento {:?}: {}", path, e);
            String::new()
        }
    }
}
