// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CALCULADORA DE VOLTAGEM DE PILHA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Função pura que mapeia um par de eletrodos em texto livre para a voltagem
// da pilha correspondente, usando a tabela de potenciais padrão.
//
// Contrato: sempre retorna uma string legível (resultado ou mensagem de
// erro corretiva), nunca retorna erro nem entra em pânico.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::data::PotentialTable;

/// Separador entre os dois eletrodos na entrada ("cobre e zinco").
const SEPARATOR: &str = " e ";

/// Calcula a voltagem de uma pilha a partir de dois eletrodos em texto livre.
///
/// Algoritmo:
/// 1. Divide a entrada no separador `" e "`, normaliza e descarta vazios.
/// 2. Exige exatamente dois eletrodos; caso contrário, erro de formato.
/// 3. Resolve cada token na tabela por inclusão de substring (primeira
///    entrada em ordem de carga vence).
/// 4. Cátodo = maior potencial, ânodo = menor. Em empate, a primeira
///    ocorrência na ordem dos tokens vence tanto para cátodo quanto para
///    ânodo, então dois eletrodos idênticos dão 0.00 V.
/// 5. Voltagem = E°(cátodo) − E°(ânodo), sempre ≥ 0.
pub fn calculate_voltage(electrodes: &str, table: &PotentialTable) -> String {
    let tokens: Vec<String> = electrodes
        .split(SEPARATOR)
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != 2 {
        return "Por favor, especifique exatamente dois eletrodos separados por 'e' \
                (ex: 'cobre e zinco')."
            .to_string();
    }

    let mut resolved: Vec<(&str, f64)> = Vec::with_capacity(2);
    for token in &tokens {
        match table.lookup(token) {
            Some((_, volts)) => resolved.push((token.as_str(), volts)),
            None => {
                return format!(
                    "Não encontrei o potencial padrão para '{}'. \
                     Verifique a grafia ou se está na tabela.",
                    token
                );
            }
        }
    }

    // Varredura com comparação estrita: empate mantém a primeira ocorrência.
    let (cathode, cathode_volts) = resolved
        .iter()
        .skip(1)
        .fold(resolved[0], |best, &e| if e.1 > best.1 { e } else { best });
    let (anode, anode_volts) = resolved
        .iter()
        .skip(1)
        .fold(resolved[0], |best, &e| if e.1 < best.1 { e } else { best });

    let voltage = cathode_volts - anode_volts;

    format!(
        "A voltagem da pilha com {} e {} é de {:.2} V.",
        capitalize(cathode),
        capitalize(anode),
        voltage
    )
}

/// Capitaliza a primeira letra de um nome de eletrodo.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daniell_table() -> PotentialTable {
        let mut table = PotentialTable::new();
        table.insert("cobre", 0.34);
        table.insert("zinco", -0.76);
        table.insert("prata", 0.80);
        table
    }

    #[test]
    fn test_daniell_cell() {
        let result = calculate_voltage("cobre e zinco", &daniell_table());
        assert_eq!(
            result,
            "A voltagem da pilha com Cobre e Zinco é de 1.10 V."
        );
    }

    #[test]
    fn test_order_independent() {
        let table = daniell_table();
        let a = calculate_voltage("cobre e zinco", &table);
        let b = calculate_voltage("zinco e cobre", &table);
        // Mesma voltagem e mesma identificação de cátodo/ânodo.
        assert_eq!(a, b);
    }

    #[test]
    fn test_voltage_is_absolute_difference() {
        let result = calculate_voltage("prata e zinco", &daniell_table());
        assert!(result.contains("1.56 V"));
        assert!(result.contains("Prata e Zinco"));
    }

    #[test]
    fn test_single_electrode_is_format_error() {
        let result = calculate_voltage("cobre", &daniell_table());
        assert!(result.contains("exatamente dois eletrodos"));
    }

    #[test]
    fn test_three_electrodes_is_format_error() {
        let result = calculate_voltage("a e b e c", &daniell_table());
        assert!(result.contains("exatamente dois eletrodos"));
    }

    #[test]
    fn test_unknown_electrode_named_in_error() {
        let result = calculate_voltage("cobre e unobtânio", &daniell_table());
        assert!(result.contains("'unobtânio'"));
        assert!(result.contains("Não encontrei o potencial padrão"));
    }

    #[test]
    fn test_empty_table_always_not_found() {
        let result = calculate_voltage("cobre e zinco", &PotentialTable::new());
        assert!(result.contains("Não encontrei o potencial padrão para 'cobre'"));
    }

    #[test]
    fn test_identical_electrodes_give_zero() {
        let result = calculate_voltage("cobre e cobre", &daniell_table());
        assert_eq!(
            result,
            "A voltagem da pilha com Cobre e Cobre é de 0.00 V."
        );
    }

    #[test]
    fn test_equal_potentials_tie_break_keeps_first() {
        let mut table = PotentialTable::new();
        table.insert("ferro", 0.10);
        table.insert("níquel", 0.10);

        let result = calculate_voltage("ferro e níquel", &table);
        // Empate: o primeiro token é cátodo e ânodo ao mesmo tempo.
        assert_eq!(
            result,
            "A voltagem da pilha com Ferro e Ferro é de 0.00 V."
        );
    }

    // Limitação conhecida do casamento por substring: um token pode resolver
    // para a entrada errada quando o nome de um eletrodo é substring do nome
    // de outro carregado antes.
    #[test]
    fn test_known_divergence_substring_match_can_hit_wrong_entry() {
        let mut table = PotentialTable::new();
        table.insert("zinco amalgamado", -1.20);
        table.insert("zinco", -0.76);
        table.insert("cobre", 0.34);

        let result = calculate_voltage("cobre e zinco", &table);
        // "zinco" casa primeiro com "zinco amalgamado" (carregado antes),
        // então a voltagem usa -1.20 e não -0.76.
        assert!(result.contains("1.54 V"));
    }
}
