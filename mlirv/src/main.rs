mod config;
mod error;
mod msg;

use color_print::cprintln;
use error::Error;
use mlir::{
    render, render_tree, AliasTable, MlirGrammar, OpDetail, Program, ProjectionPolicy, Role,
    SsaCursor, SsaDetail, SsaIndex,
};
use msg::Msg;
use std::process::ExitCode;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.mlir")]
    input: String,

    /// Projection policy file (YAML)
    #[clap(short, long)]
    config: Option<String>,

    /// Hide the `: (...) -> ...` type signature
    #[clap(long)]
    no_types: bool,

    /// Attributes shown inline, comma separated
    #[clap(short = 'a', long)]
    inline_attrs: Option<String>,

    /// Type attribute paths kept, comma separated (e.g. bufferLoc,sharding.dims)
    #[clap(short = 't', long)]
    inline_type_attrs: Option<String>,

    /// Start from the sample filters
    #[clap(long)]
    sample: bool,

    /// Show operations inside regions
    #[clap(short, long)]
    expand: bool,

    /// Show details of an operation
    #[clap(long = "op", value_name = "ID")]
    ops: Vec<usize>,

    /// Show definition and uses of an SSA value
    #[clap(long = "ssa", value_name = "NAME")]
    ssa: Vec<String>,

    /// Dump the parsed program as YAML
    #[clap(short, long)]
    dump: bool,

    /// Print debug logs
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    use clap::Parser;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let args: Args = Args::parse();

    // Parse failures are reported as diagnostics, so library logs stay quiet by default
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::ERROR
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error.print();
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let policy = config::Overrides {
        config: args.config.clone(),
        sample: args.sample,
        no_types: args.no_types,
        inline_attrs: args.inline_attrs.clone(),
        inline_type_attrs: args.inline_type_attrs.clone(),
    }
    .policy()?;

    println!("1. Read File and Assemble Statements");
    println!("  < {}", args.input);
    let text = std::fs::read_to_string(&args.input)
        .map_err(|e| Error::FileOpen(args.input.clone(), e))?;
    let (statements, aliases) = mlir::assemble(&text);
    println!("  {} statements, {} location aliases", statements.len(), aliases.len());

    println!("2. Parse Operations");
    let program = Program::build(&statements, &MlirGrammar);
    let lines: Vec<&str> = text.split('\n').collect();
    let mut failed = 0;
    for (statement, op) in statements.iter().zip(program.ops()) {
        let Some(error) = &op.error else {
            continue;
        };
        failed += 1;
        // Rows count from the statement's first line; the first line was trimmed
        let (row, col) = error.found().map_or((0, None), |found| (found.row, Some(found.col)));
        let line = statement.line + row;
        let raw = lines.get(line - 1).copied().unwrap_or("");
        let indent = if row == 0 { raw.len() - raw.trim_start().len() } else { 0 };
        Msg::Warn(error.to_string()).diag((args.input.as_str(), line, raw), col.map(|c| c + indent));
        if statement.unterminated {
            Msg::Note("Statement is not closed before the end of the file".to_string()).print();
        }
    }
    println!("  {} operations, {} failed", program.len(), failed);

    println!("3. Simplified View");
    print_view(&program, &aliases, &policy, args.expand);

    for &id in &args.ops {
        match OpDetail::of(&program, id, &aliases, &policy) {
            Some(detail) => print!("\n{detail}"),
            None => Msg::Note(format!("No operation with id {id}")).print(),
        }
    }

    if !args.ssa.is_empty() {
        let index = SsaIndex::new(&program);
        for name in &args.ssa {
            match SsaDetail::of(&index, name, &aliases, &policy) {
                Some(detail) => print!("\n{detail}"),
                None => Msg::Note(format!("Could not find definition for {name}")).print(),
            }
            if let Some(mut cursor) = SsaCursor::new(&index, name) {
                println!("  Occurrences:");
                cursor.first();
                for _ in 0..cursor.sites().len() {
                    let site = cursor.current();
                    let role = match site.role {
                        Role::Def => "def".to_string(),
                        Role::Use(idx) => format!("use #{idx}"),
                    };
                    let line = program
                        .get(site.op)
                        .map(|op| render(op, &aliases, &policy))
                        .unwrap_or_default();
                    println!("    [{}] {:<7} {}", cursor.position(), role, line);
                    cursor.next();
                }
            }
        }
    }

    if args.dump {
        let yaml = serde_yaml::to_string(&program).map_err(Error::Dump)?;
        println!("-------------------+-----------------------------------------------------");
        print!("{yaml}");
    }
    Ok(())
}

fn print_view(program: &Program, aliases: &AliasTable, policy: &ProjectionPolicy, expand: bool) {
    if expand {
        println!("{}", render_tree(program, aliases, policy));
        return;
    }
    for op in program.ops() {
        let line = render(op, aliases, policy);
        if op.is_parse_error() {
            cprintln!("<red>{}</>", line);
        } else {
            println!("{line}");
        }
    }
}
