//! Rendering for the `list` subcommand.

use apibake::BakedCli;
use clap::ValueEnum;

/// The formats `list` can print a registry in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-delimited text, one action per line.
    Text,
    /// A JSON array of action records.
    Json,
}

/// Prints every command/action pair of the registry.
pub fn print_listing(registry: &BakedCli, format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Text => {
            for (command, actions) in &registry.commands {
                for (action, operation) in actions {
                    println!(
                        "{}",
                        [
                            command.as_str(),
                            action.as_str(),
                            operation.method.as_str(),
                            operation.summary.as_str(),
                        ]
                        .join("\t")
                    );
                }
            }
        }
        OutputFormat::Json => {
            let records: Vec<serde_json::Value> = registry
                .commands
                .iter()
                .flat_map(|(command, actions)| {
                    actions.iter().map(move |(action, operation)| {
                        serde_json::json!({
                            "command": command,
                            "action": action,
                            "method": operation.method,
                            "summary": operation.summary,
                            "url": operation.url,
                        })
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
