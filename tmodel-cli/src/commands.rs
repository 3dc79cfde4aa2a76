//! Subcommand handlers.

use crate::Commands;
use crate::WeightsAction;
use std::io::Write;
use std::path::Path;
use tmodel_core::{TrainingConfig, WeightsLocator};

/// Run a subcommand, writing its result to `out`.
///
/// Returns `false` when a lookup finds nothing; that is not an error.
pub fn handle_command(
    command: Commands,
    config: &TrainingConfig,
    workspace: &Path,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    match command {
        Commands::Config { json } => {
            let rendered = if json {
                config.to_json()?
            } else {
                config.to_toml()?
            };
            writeln!(out, "{}", rendered.trim_end())?;
            Ok(true)
        }
        Commands::Weights { action } => {
            let locator = WeightsLocator::new(config).with_root(workspace);
            handle_weights(action, config, &locator, out)
        }
        Commands::Tokenizer { lang } => {
            match lang {
                Some(lang) => writeln!(out, "{}", config.tokenizer_path(&lang).display())?,
                None => {
                    writeln!(
                        out,
                        "{}\t{}",
                        config.lang_src,
                        config.source_tokenizer_path().display()
                    )?;
                    writeln!(
                        out,
                        "{}\t{}",
                        config.lang_tgt,
                        config.target_tokenizer_path().display()
                    )?;
                }
            }
            Ok(true)
        }
    }
}

fn handle_weights(
    action: WeightsAction,
    config: &TrainingConfig,
    locator: &WeightsLocator,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    match action {
        WeightsAction::Path { epoch } => {
            writeln!(out, "{}", locator.weights_file_path(&epoch).display())?;
            Ok(true)
        }
        WeightsAction::Latest => match locator.latest_weights_file_path()? {
            Some(path) => {
                writeln!(out, "{}", path.display())?;
                Ok(true)
            }
            None => {
                eprintln!(
                    "No checkpoint found in {}",
                    locator.resume_dir().display()
                );
                Ok(false)
            }
        },
        WeightsAction::List => {
            for path in locator.list_weights_files()? {
                writeln!(out, "{}", path.display())?;
            }
            Ok(true)
        }
        WeightsAction::Resume => {
            let Some(preload) = config.preload.as_deref() else {
                eprintln!("preload is not set; training would start from scratch");
                return Ok(false);
            };
            match locator.resolve_preload(Some(preload))? {
                Some(path) => {
                    writeln!(out, "{}", path.display())?;
                    Ok(true)
                }
                None => {
                    eprintln!(
                        "No checkpoint found for preload '{}' in {}",
                        preload,
                        locator.resume_dir().display()
                    );
                    Ok(false)
                }
            }
        }
    }
}
