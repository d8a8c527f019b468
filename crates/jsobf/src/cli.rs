use crate::crypto::DEFAULT_KEY_BITS;

use clap::Parser;

use std::path::PathBuf;

/// Defines and parses the command-line arguments accepted by the obfuscator.
///
/// This struct uses `clap::Parser` to automatically generate a parser from
/// its definition. Each field corresponds to a specific command-line option
/// or flag that controls which passes run and where the artifact lands.
#[derive(Parser, Debug)]
#[command(author, version, about = "Obfuscates JavaScript sources with per-literal RSA-OAEP encryption", long_about = None)]
pub struct Args {
    /// The JavaScript source file to obfuscate.
    #[clap(long, short = 'f')]
    pub file: PathBuf,

    /// Where to write the obfuscated artifact. When omitted, the path is
    /// derived from the input by inserting `.obf` before the extension.
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// RSA modulus length in bits for the per-literal keypairs.
    #[clap(long, short = 'k', default_value_t = DEFAULT_KEY_BITS)]
    pub key_length: usize,

    /// Obfuscate string literals.
    #[clap(long, short = 's')]
    pub strings: bool,

    /// Obfuscate identifiers.
    #[clap(long, short = 'i')]
    pub identifiers: bool,

    /// Skip the whitespace minification step and keep the assembled
    /// artifact as written.
    #[clap(long)]
    pub no_minify: bool,

    /// Report tokenizer diagnostics and per-stage chatter.
    #[clap(long)]
    pub verbose: bool,

    /// Measure and report the time taken by each stage.
    #[clap(long)]
    pub profile: bool,
}

impl Args {
    /// Parses command-line arguments from the execution environment.
    ///
    /// # Panics
    ///
    /// Exits the process if `clap` fails to parse the arguments; in that
    /// case `clap` prints the error or the help screen itself.
    pub fn from_cli() -> Self {
        Self::parse()
    }
}
