/*
A tool for pretty printing a summary of a render run: data shapes, grid size, frame plan, outputs.
*/
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SummaryRow {
    key: &'static str,
    value: String,
}

/// Ordered key/value rows collected during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    rows: Vec<SummaryRow>,
}

impl RunSummary {
    pub fn new() -> Self {
        RunSummary::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.rows.push(SummaryRow {
            key,
            value: value.to_string(),
        });
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.key == key)
            .map(|r| r.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn table(&self) -> String {
        let mut table = Table::new(&self.rows);
        table.with(Style::modern_rounded());
        table.to_string()
    }

    pub fn print(&self, title: &str) {
        println!("{}\n", title);
        println!("{}", self.table());
    }
}
