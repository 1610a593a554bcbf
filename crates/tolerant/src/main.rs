use std::process::ExitCode;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use tolerant_errors::{Diagnostic, Renderer};
use tolerant_lexer::{LexConfig, tokenize};
use tolerant_parse::{ParseConfig, parse_bytes_with_config};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Error-tolerant PHP parser")]
enum Options {
    /// Parse a file and print its syntax tree and diagnostics.
    Parse {
        path: Utf8PathBuf,
        /// Print the token stream before the tree.
        #[arg(long)]
        tokens: bool,
        #[arg(long)]
        no_tree: bool,
        /// Treat a bare `<?` as inline HTML.
        #[arg(long)]
        no_short_open_tag: bool,
        /// Render diagnostics without colors.
        #[arg(long)]
        plain: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Options::parse() {
        Options::Parse { path, tokens, no_tree, no_short_open_tag, plain } => {
            let bytes = std::fs::read(&path).with_context(|| format!("failed to read `{path}`"))?;

            let config = ParseConfig { lex: LexConfig { short_open_tag: !no_short_open_tag } };
            tracing::info!(%path, len = bytes.len(), "parsing");

            let parse = parse_bytes_with_config(&bytes, config)
                .with_context(|| format!("failed to parse `{path}`"))?;
            let text = parse.tree().text();

            if tokens {
                print_tokens(text, config.lex);
            }
            if !no_tree {
                print!("{}", parse.debug_tree());
            }

            let renderer = if plain { Renderer::plain() } else { Renderer::styled() };
            for diagnostic in parse.diagnostics() {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), text));
            }

            let errors = parse.diagnostics().iter().filter(|it| it.is_error()).count();
            if errors > 0 {
                eprintln!("{errors} error(s) in `{path}`");
                return Ok(ExitCode::FAILURE);
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_tokens(text: &str, config: LexConfig) {
    for token in tokenize(text, config) {
        let mut offset = token.full_range().start();
        for piece in &token.leading {
            let end = offset + piece.len;
            println!(
                "  {:?}@{:?} {:?}",
                piece.kind.syntax_kind(),
                offset..end,
                &text[usize::from(offset)..usize::from(end)]
            );
            offset = end;
        }
        println!("{:?}@{:?} {:?}", token.kind, token.range, &text[token.range]);
        if let Some(error) = token.error.as_ref().map(Diagnostic::message) {
            println!("  ^ {error}");
        }
    }
}
