use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use scripture_parser::SourceFormat;

#[derive(Args, Debug)]
pub struct Formats {
    /// Print only canonical identifiers, one per line
    #[arg(short, long)]
    pub quiet: bool,
}

impl Formats {
    pub fn execute(&self) -> Result<()> {
        let listing = self.listing();
        write!(io::stdout(), "{listing}")?;
        Ok(())
    }

    fn listing(&self) -> String {
        SourceFormat::ALL
            .iter()
            .map(|format| {
                if self.quiet {
                    format!("{}\n", format.identifier())
                } else {
                    format!(
                        "{:<12} (aliases: {})\n",
                        format.identifier(),
                        format.aliases().join(", ")
                    )
                }
            })
            .collect()
    }
}
