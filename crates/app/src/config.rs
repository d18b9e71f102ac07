//! Command-line options for the replay host

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

pub const USAGE: &str = "usage: brushwork <script.json> [out.png] [--seed N]";

/// Where to read the stroke script and write the image
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    pub script: PathBuf,
    pub output: PathBuf,
    /// Fixed seed for reproducible brushes; random when absent
    pub seed: Option<u64>,
}

impl ReplayConfig {
    /// Parse from process arguments, excluding the program name
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut positional = Vec::new();
        let mut seed = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().context("--seed needs a value")?;
                    seed = Some(
                        value
                            .parse::<u64>()
                            .with_context(|| format!("invalid seed {value:?}"))?,
                    );
                }
                flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(script) = positional.next() else {
            bail!("missing script path\n{USAGE}");
        };
        let output = positional.next().unwrap_or_else(|| "brushwork.png".to_string());
        if let Some(extra) = positional.next() {
            bail!("unexpected argument {extra:?}\n{USAGE}");
        }

        Ok(Self {
            script: script.into(),
            output: output.into(),
            seed,
        })
    }
}
