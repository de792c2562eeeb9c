//! Plain-text rendering of tables and summary figures

use chrono::{DateTime, Utc};
use std::fmt;

use crate::types::{Candidato, Eleicao, Eleitor, LogEntry, Urna};

/// `15/08/2024 10:30`
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

/// Integer with pt-BR thousands separators: `1234567` -> `1.234.567`
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Row representation of an entity
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl Tabular for Urna {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Número", "Localização", "Status", "Última Atividade"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.numero.clone(),
            self.localizacao.clone(),
            self.status.to_string(),
            self.ultima_atividade
                .as_ref()
                .map(format_datetime)
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl Tabular for Eleicao {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Nome", "Início", "Fim", "Urna", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.nome.clone(),
            format_datetime(&self.data_inicio),
            format_datetime(&self.data_fim),
            self.urna_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Candidato {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Nome", "Número", "Partido", "Eleição", "Votos"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.nome.clone(),
            self.numero.to_string(),
            self.partido.clone().unwrap_or_else(|| "-".to_string()),
            self.eleicao_id.to_string(),
            self.votos.map(format_count).unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl Tabular for Eleitor {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Nome", "CPF", "Matrícula"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.nome.clone(),
            self.formatted_cpf(),
            self.matricula.clone(),
        ]
    }
}

impl Tabular for LogEntry {
    fn headers() -> Vec<&'static str> {
        vec!["Data", "Ação", "Usuário", "Descrição"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            format_datetime(&self.data),
            self.acao.clone(),
            self.usuario.nome.clone(),
            self.descricao.clone(),
        ]
    }
}

/// Text table; an empty table renders a single message row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub empty_message: String,
}

impl Table {
    pub fn new(headers: Vec<&str>, empty_message: impl Into<String>) -> Self {
        Self {
            headers: headers.into_iter().map(str::to_string).collect(),
            rows: Vec::new(),
            empty_message: empty_message.into(),
        }
    }

    pub fn from_items<'a, T: Tabular + 'a>(
        items: impl IntoIterator<Item = &'a T>,
        empty_message: impl Into<String>,
    ) -> Self {
        let mut table = Self::new(T::headers(), empty_message);
        table.rows = items.into_iter().map(Tabular::row).collect();
        table
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as displayed, including the message row of an empty table
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        if self.rows.is_empty() {
            vec![vec![self.empty_message.clone()]]
        } else {
            self.rows.clone()
        }
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_row(f, &self.headers, &widths)?;
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        writeln!(f, "{}", "-".repeat(total))?;
        if self.rows.is_empty() {
            return writeln!(f, "{}", self.empty_message);
        }
        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

/// One summary figure of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: String,
    pub value: String,
}

impl StatCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for StatCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1234), "1.234");
        assert_eq!(format_count(1234567), "1.234.567");
    }

    #[test]
    fn test_format_datetime() {
        let at = Utc.with_ymd_and_hms(2024, 8, 5, 9, 7, 0).unwrap();
        assert_eq!(format_datetime(&at), "05/08/2024 09:07");
    }

    #[test]
    fn test_empty_table_renders_message_row() {
        let table = Table::from_items::<Eleitor>([], "Nenhum eleitor encontrado.");
        assert!(table.is_empty());
        assert_eq!(table.display_rows(), vec![vec!["Nenhum eleitor encontrado.".to_string()]]);
        assert!(table.to_string().ends_with("Nenhum eleitor encontrado.\n"));
    }

    #[test]
    fn test_columns_are_aligned() {
        let mut table = Table::new(vec!["ID", "Nome"], "vazio");
        table.push(vec!["1".into(), "Ana".into()]);
        table.push(vec!["100".into(), "Bê".into()]);
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID   Nome");
        assert_eq!(lines[2], "1    Ana");
        assert_eq!(lines[3], "100  Bê");
    }
}
