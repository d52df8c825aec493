use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mips_compiler::backend::compile_ir_to_mips;
use mips_compiler::ir::ast::Node;
use mips_compiler::ir::{listing, scope_check, ProgramIR};
use mips_compiler::{compile_to_ir_with_options, CompileOptions, RegisterPolicy};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mipsc")]
#[command(about = "Lower a syntax tree to three-address IR and MIPS assembly")]
struct Args {
    /// JSON syntax tree (or IR listing with --from-ir). Reads stdin when absent.
    file: Option<PathBuf>,

    /// Treat the input as an IR listing instead of a syntax tree
    #[arg(long)]
    from_ir: bool,

    /// Emit IR. If none of --ir/--asm/--both is given, defaults to --asm.
    #[arg(long)]
    ir: bool,

    /// Emit MIPS assembly
    #[arg(long)]
    asm: bool,

    /// Emit both IR and MIPS assembly
    #[arg(long)]
    both: bool,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of registers available for symbols ($t0..$t9, then $s0..$s7)
    #[arg(long)]
    registers: Option<usize>,

    /// Register assignment policy
    #[arg(long, value_enum)]
    policy: Option<PolicyOpt>,

    /// Emit the labels and jumps `if`/`while` need to execute correctly
    #[arg(long)]
    close_control_flow: bool,

    /// TOML file with compile options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the declaration/use check before lowering
    #[arg(long)]
    no_check: bool,

    /// Print the syntax tree before compiling
    #[arg(long)]
    dump_ast: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG also works
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PolicyOpt {
    Permanent,
    ReleaseDeadTemps,
}

impl From<PolicyOpt> for RegisterPolicy {
    fn from(p: PolicyOpt) -> Self {
        match p {
            PolicyOpt::Permanent => RegisterPolicy::Permanent,
            PolicyOpt::ReleaseDeadTemps => RegisterPolicy::ReleaseDeadTemps,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = resolve_options(&args)?;
    debug!(?options, "compile options");

    let src = read_input(args.file.as_deref())?;
    let mut out = String::new();

    let ir = if args.from_ir {
        if args.dump_ast {
            warn!("--dump-ast has no effect on an IR listing");
        }
        listing::parse(&src).context("Failed to read IR listing")?
    } else {
        let tree: Node = serde_json::from_str(&src).context("Input is not a valid JSON syntax tree")?;
        if args.dump_ast {
            out.push_str(&format!("{tree}\n"));
        }
        if !args.no_check {
            scope_check::check(&tree).context("Scope check failed")?;
        }
        compile_to_ir_with_options(&tree, &options).context("Lowering failed")?
    };

    // Determine outputs
    let mut want_ir = args.ir;
    let mut want_asm = args.asm;
    if args.both {
        want_ir = true;
        want_asm = true;
    }
    if !want_ir && !want_asm {
        want_asm = true;
    }

    if want_ir {
        emit_ir(&mut out, &ir);
    }
    if want_asm {
        let asm = compile_ir_to_mips(&ir, &options).context("Assembly generation failed")?;
        out.push_str(&asm.join());
        out.push('\n');
    }

    match &args.output {
        Some(path) => fs::write(path, out).with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => print!("{out}"),
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Defaults, then the config file, then command-line flags.
fn resolve_options(args: &Args) -> Result<CompileOptions> {
    let mut options = match &args.config {
        Some(path) => load_config(path)?,
        None => CompileOptions::default(),
    };
    if let Some(n) = args.registers {
        options.register_count = n;
    }
    if let Some(p) = args.policy {
        options.register_policy = p.into();
    }
    if args.close_control_flow {
        options.close_control_flow = true;
    }
    options.validate()?;
    Ok(options)
}

fn load_config(path: &Path) -> Result<CompileOptions> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read config '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config '{}'", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).with_context(|| format!("Error reading file '{}'", p.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Error reading stdin")?;
            Ok(buf)
        }
    }
}

fn emit_ir(out: &mut String, ir: &ProgramIR) {
    for line in ir.to_lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
}
