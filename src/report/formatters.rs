use crate::deployer::FarmDeployer;
use alloy_primitives::Address;
use comfy_table::{Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use csv::Writer;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

pub fn format_deployers(deployers: &[FarmDeployer], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_deployers_table(deployers),
        OutputFormat::Json => format_deployers_json(deployers),
        OutputFormat::Csv => format_deployers_csv(deployers),
    }
}

fn format_deployers_table(deployers: &[FarmDeployer]) -> String {
    if deployers.is_empty() {
        return "No farms found.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["#", "Farm", "Deployer", "Block", "Tx Hash", "Events"]);

    for entry in deployers {
        table.add_row(vec![
            Cell::new(entry.index),
            Cell::new(entry.farm.to_string()),
            Cell::new(entry.deployer.map_or("-".to_string(), |d| d.to_string())),
            Cell::new(entry.block_number.map_or("-".to_string(), |b| b.to_string())),
            Cell::new(
                entry
                    .transaction_hash
                    .map_or("-".to_string(), |h| format_tx_hash(&h.to_string())),
            ),
            Cell::new(entry.matched_events),
        ]);
    }

    table.to_string()
}

/// One object per farm: `{farm: deployer}`, or `{}` when no deployer was found.
fn format_deployers_json(deployers: &[FarmDeployer]) -> String {
    let json_deployers: Vec<Value> = deployers
        .iter()
        .map(|entry| {
            let mut mapping = Map::new();
            if let Some(deployer) = entry.deployer {
                mapping.insert(entry.farm.to_string(), json!(deployer.to_string()));
            }
            Value::Object(mapping)
        })
        .collect();

    serde_json::to_string_pretty(&json_deployers).unwrap_or_else(|_| "[]".to_string())
}

fn format_deployers_csv(deployers: &[FarmDeployer]) -> String {
    let mut wtr = Writer::from_writer(vec![]);

    let _ = wtr.write_record([
        "index",
        "farm",
        "deployer",
        "block_number",
        "transaction_hash",
        "matched_events",
    ]);

    for entry in deployers {
        let _ = wtr.write_record([
            &entry.index.to_string(),
            &entry.farm.to_string(),
            &entry.deployer.map(|d| d.to_string()).unwrap_or_default(),
            &entry
                .block_number
                .map(|b| b.to_string())
                .unwrap_or_default(),
            &entry
                .transaction_hash
                .map(|h| h.to_string())
                .unwrap_or_default(),
            &entry.matched_events.to_string(),
        ]);
    }

    String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
}

pub fn format_farms(farms: &[Address], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            if farms.is_empty() {
                return "No farms found.".to_string();
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["#", "Farm"]);
            for (i, farm) in farms.iter().enumerate() {
                table.add_row(vec![Cell::new(i), Cell::new(farm.to_string())]);
            }
            table.to_string()
        }
        OutputFormat::Json => {
            let json_farms: Vec<_> = farms.iter().map(|f| f.to_string()).collect();
            serde_json::to_string_pretty(&json_farms).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(vec![]);
            let _ = wtr.write_record(["index", "farm"]);
            for (i, farm) in farms.iter().enumerate() {
                let _ = wtr.write_record([&i.to_string(), &farm.to_string()]);
            }
            String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
        }
    }
}

fn format_tx_hash(hash: &str) -> String {
    if hash.len() <= 10 {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..6], &hash[hash.len() - 4..])
}
