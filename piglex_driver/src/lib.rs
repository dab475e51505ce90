//! Contains the `piglex` command: argument parsing, loading the lex specification, and running the
//! scanner against a consumer that prints the tokens or the rule table.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

use std::{
    cell::Cell,
    fs::File,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{Arc, Once},
};

pub use clap::Parser;
use piglex_base::{
    diagnostic::Handler,
    log::{Message, Severity, SourceLineDisplay},
    source_file::{self, SourceFile},
};
use piglex_lexical::{
    channel::{scan_concurrently, DEFAULT_CAPACITY},
    config::{Options, UnknownDirectivePolicy},
    error::Diagnostic,
    registry::Registry,
    scanner::Scanner,
};
use piglex_rules::rule_table::RuleTable;

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "piglex",
    version,
    about = "PigLex, a lexer generator front end.",
    author = "Philippe Hilger (PeerGum)"
)]
pub struct Argument {
    /// The lex specification to scan.
    #[clap(
        value_name = "FILE",
        required_unless_present = "file_flag",
        conflicts_with = "file_flag"
    )]
    pub file: Option<PathBuf>,

    /// The lex specification to scan.
    #[clap(short = 'f', long = "file", value_name = "FILE")]
    pub file_flag: Option<PathBuf>,

    /// What to do with a directive that is not known.
    #[clap(long, value_name = "POLICY", default_value_t = UnknownDirectivePolicy::Ignore)]
    pub unknown_directives: UnknownDirectivePolicy,

    /// The number of tokens in flight between the scanner and the printer; 0 hands every token
    /// over directly.
    #[clap(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Prints the rules grouped by state instead of the tokens.
    #[clap(long)]
    pub rules: bool,
}

impl Argument {
    /// Gets the path of the lex specification, however it was given.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.file.as_deref().or(self.file_flag.as_deref())
    }

    fn options(&self) -> Options {
        Options {
            unknown_directives: self.unknown_directives,
        }
    }
}

/// A struct that implements [`Handler`] and prints every diagnostic to the standard error stream
/// along with the source line it points at.
#[derive(Debug)]
struct Printer {
    source_file: Arc<SourceFile>,
    errors: Cell<usize>,
}

impl Printer {
    fn new(source_file: Arc<SourceFile>) -> Self {
        Self {
            source_file,
            errors: Cell::new(0),
        }
    }

    fn has_errors(&self) -> bool { self.errors.get() > 0 }
}

impl Handler<Diagnostic> for Printer {
    fn receive(&self, diagnostic: Diagnostic) {
        if diagnostic.severity() == Severity::Error {
            self.errors.set(self.errors.get() + 1);
        }

        eprintln!(
            "{diagnostic}\n{}",
            SourceLineDisplay::new(&self.source_file, diagnostic.location(), None::<&str>)
        );
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the tracing subscriber, once, and only when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn report_load_error(path: &Path, error: &source_file::Error) {
    let msg = Message::new(Severity::Error, format!("{}: {error}", path.display()));
    eprintln!("{msg}");
}

/// Scans the loaded source and prints the tokens, or the rule table, to the standard output.
///
/// Returns `true` when the scan finished without any error diagnostic.
fn scan(source_file: &Arc<SourceFile>, argument: &Argument) -> bool {
    let printer = Printer::new(source_file.clone());
    let mut registry = Registry::new();
    let mut scanner = Scanner::new(
        source_file.content(),
        &mut registry,
        &printer,
        argument.options(),
    );

    let print_rules = argument.rules;
    let (result, table) = scan_concurrently(&mut scanner, argument.capacity, move |receiver| {
        if print_rules {
            Some(RuleTable::collect(receiver))
        } else {
            for token in receiver {
                println!("{token}");
            }
            None
        }
    });

    if let Err(error) = result {
        eprintln!("{}", Message::new(Severity::Error, &error));
        if let Some(location) = error.location() {
            eprintln!(
                "{}",
                SourceLineDisplay::new(source_file, location, None::<&str>)
            );
        }
        return false;
    }

    if let Some(table) = table {
        print!("{table}");
    }

    tracing::info!(
        tokens = registry.tokens().len(),
        states = registry.states().len(),
        "scan finished"
    );

    !printer.has_errors()
}

/// Runs the program with the given arguments.
pub fn run(argument: Argument) -> ExitCode {
    init_tracing();

    let Some(path) = argument.source_path() else {
        eprintln!("{}", Message::new(Severity::Error, "no input file"));
        return ExitCode::FAILURE;
    };

    let source_file = match File::open(path)
        .map_err(source_file::Error::from)
        .and_then(|file| SourceFile::load(file, path.to_path_buf()))
    {
        Ok(source_file) => source_file,
        Err(error) => {
            report_load_error(path, &error);
            return ExitCode::FAILURE;
        }
    };

    if scan(&source_file, &argument) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
