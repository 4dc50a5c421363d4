//! Tabular display of a parameter collection

use super::parameter::Parameter;
use super::parameters::Parameters;
use std::fmt;

struct Row {
    name: String,
    value: String,
    scaled: String,
}

impl Parameters {
    fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for (name, parameter) in self.iter() {
            let label = match parameter {
                Parameter::Concrete(_) => name.to_string(),
                Parameter::Function(function) => format!("{}{}", name, function),
            };
            let value = self
                .quantity(name)
                .map(|quantity| quantity.to_string())
                .unwrap_or_else(|_| "Unknown".to_string());
            let scaled = self
                .scaled(name)
                .map(|scaled| scaled.to_string())
                .unwrap_or_else(|_| "Unknown".to_string());
            rows.push(Row {
                name: label,
                value,
                scaled,
            });
        }
        for (name, units) in self.declared_units() {
            rows.push(Row {
                name: name.to_string(),
                value: format!("- {}", units),
                scaled: "-".to_string(),
            });
        }
        rows
    }
}

#[cfg(feature = "table")]
impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use comfy_table::presets::UTF8_FULL_CONDENSED;
        use comfy_table::{ContentArrangement, Table};

        if self.is_empty() {
            return write!(f, "No parameters have been specified.");
        }
        let rows = self.rows();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Parameter", "Value", "Scaled"]);
        for row in rows {
            table.add_row(vec![row.name, row.value, row.scaled]);
        }
        write!(f, "{}", table)
    }
}

#[cfg(not(feature = "table"))]
impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No parameters have been specified.");
        }
        let rows = self.rows();
        for (index, row) in rows.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{} = {} ({})", row.name, row.value, row.scaled)?;
        }
        Ok(())
    }
}
