use std::path::{Path, PathBuf};

use clap::Subcommand;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// JSON schema of the origin set document
    JsonSchema {
        /// Output file, stdout when omitted
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = courier_matrix::schema::generate_origin_set_schema()?;

            match out {
                Some(out) => write_file(&out, &schema)?,
                None => println!("{schema}"),
            }
        }
    }

    Ok(())
}

/// Writes `content` to `out`, creating missing parent folders.
pub fn write_file(out: &Path, content: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(out, content)
}
