use jsobf::{
    classify::classify,
    cli::Args,
    crypto::SecretFactory,
    emit, minify,
    obfuscate::{obfuscate_identifiers, obfuscate_strings, Artifact},
    profile::Profiler,
    tok::lex::Lexer,
};

use jsobf_sourcemap::{diag, SourceFile};

use anyhow::{Context, Result};

fn main() {
    let args = Args::from_cli();
    let mut profiler = Profiler::new(args.profile);
    let r = try_main(&args, &mut profiler);
    profiler
        .report(&mut std::io::stdout())
        .expect("Failed to write profile report");
    if let Err(e) = r {
        eprintln!("{:?}", e);
        std::process::exit(1)
    }
}

fn try_main(args: &Args, profiler: &mut Profiler) -> Result<()> {
    // Read the source file
    let file = SourceFile::new(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    // Tokenize; anomalies are tolerated and only reported in verbose mode
    let r = profiler.time("Tokenizer", || Lexer::new(&file).lex());
    if args.verbose && !r.diagnostics.is_empty() {
        diag::report_batch_to_stderr(&file, &r.diagnostics)?;
    }

    // Classify tokens
    let classification = profiler.time("Classifier", || classify(&file, &r.tokens));

    // Run the requested passes, strings strictly before identifiers
    let factory = SecretFactory::new(args.key_length);
    let mut artifact = Artifact::new(file.data().to_string());
    if args.strings {
        profiler.time("String pass", || {
            obfuscate_strings(&mut artifact, &classification.strings, &factory)
        })?;
    }
    if args.identifiers {
        profiler.time("Identifier pass", || {
            obfuscate_identifiers(&mut artifact, &classification.identifiers, &factory)
        })?;
    }

    // Assemble and write the artifact
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| emit::derive_output_path(&args.file));
    let text = profiler.time("Assembler", || emit::assemble(&artifact));
    emit::write_artifact(&output, &text)?;
    if args.verbose {
        eprintln!("wrote {}", output.display());
    }

    // Minify in place; a failure here keeps the artifact already on disk
    if !args.no_minify {
        profiler.time("Minifier", || emit::finalize(&output, minify::minify_file))?;
    }

    Ok(())
}
