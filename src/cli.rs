//! Argument parsing and subcommand dispatch.
//!
//! `enc`/`dec` share the budget and passphrase flags via `#[command(flatten)]`;
//! `info` takes neither, since it never derives subkeys.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_P, DEFAULT_R, LOG_N_MAX, LOG_N_MIN};
use crate::error::ScryptError;
use crate::file;
use crate::passphrase::{self, Method};
use crate::session::{self, ExplicitParams};
use crate::tuner::{self, Budget};
use crate::ui;

#[derive(Parser)]
#[command(name = "scryptbox", version, about = "Password-based file encryption built on the scrypt key derivation function.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file.
    Enc(EncArgs),
    /// Decrypt a file.
    Dec(DecArgs),
    /// Print a container's scrypt parameters without decrypting.
    Info(InfoArgs),
}

#[derive(Args)]
pub struct BudgetArgs {
    /// Bypass Tuner feasibility checks.
    #[arg(short = 'f')]
    force: bool,

    /// Explicit memory cap, e.g. `500M`.
    #[arg(short = 'M', value_parser = parse_size)]
    maxmem: Option<u64>,

    /// Memory cap as a fraction of physical RAM, in `[0, 0.5]`.
    #[arg(short = 'm')]
    maxmemfrac: Option<f64>,

    /// Time cap for tuning, in seconds.
    #[arg(short = 't')]
    maxtime: Option<f64>,

    /// Print chosen N/r/p diagnostics.
    #[arg(short = 'v')]
    verbose: bool,

    /// Read the passphrase from standard input, once, no confirmation.
    #[arg(short = 'P')]
    passphrase_once: bool,

    /// Passphrase source: `dev:tty-stdin`, `dev:stdin-once`, `dev:tty-once`, `env:NAME`, or `file:PATH`.
    #[arg(long = "passphrase", value_name = "method:arg")]
    passphrase: Option<String>,
}

#[derive(Args)]
pub struct EncArgs {
    #[command(flatten)]
    budget: BudgetArgs,

    /// Explicit logN in `[10, 40]`.
    #[arg(short = 'l')]
    log_n: Option<u8>,

    /// Explicit r in `[1, 128]`.
    #[arg(short = 'r')]
    r: Option<u32>,

    /// Explicit p in `[1, 128]`.
    #[arg(short = 'p')]
    p: Option<u32>,

    /// Input path, or `-` for standard input.
    infile: String,

    /// Output path; omitted means standard output.
    outfile: Option<String>,
}

#[derive(Args)]
pub struct DecArgs {
    #[command(flatten)]
    budget: BudgetArgs,

    /// Input path, or `-` for standard input.
    infile: String,

    /// Output path; omitted means standard output.
    outfile: Option<String>,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Input path, or `-` for standard input.
    infile: String,
}

fn parse_size(s: &str) -> Result<u64, String> {
    s.parse::<bytesize::ByteSize>().map(|size| size.as_u64()).map_err(|e| e.to_string())
}

/// Parses CLI arguments and runs the selected subcommand.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Enc(args) => run_enc(args),
        Commands::Dec(args) => run_dec(args),
        Commands::Info(args) => run_info(args),
    }
}

fn resolve_method(budget: &BudgetArgs) -> Result<Method> {
    match (budget.passphrase_once, &budget.passphrase) {
        (true, Some(_)) => bail!("only one --passphrase or -P may be given"),
        (true, None) => Ok(Method::StdinOnce),
        (false, Some(spec)) => Method::parse(spec),
        (false, None) => Ok(Method::default()),
    }
}

fn reject_stdin_conflict(infile: &str, method: &Method) -> Result<()> {
    if infile == "-" && method.reads_stdin() {
        bail!("passphrase and input cannot both read from standard input");
    }
    Ok(())
}

fn budget_from_args(args: &BudgetArgs) -> Budget {
    Budget { maxmem: args.maxmem.unwrap_or(0), maxmemfrac: tuner::normalize_maxmemfrac(args.maxmemfrac.unwrap_or(0.0)), maxtime: args.maxtime.unwrap_or(0.0) }
}

fn validate_log_n(value: u8) -> Result<u8> {
    if (LOG_N_MIN..=LOG_N_MAX).contains(&value) { Ok(value) } else { bail!("Invalid option: -l {value}") }
}

fn validate_r(value: u32) -> Result<u32> {
    if (1..=128).contains(&value) { Ok(value) } else { bail!("Invalid option: -r {value}") }
}

fn validate_p(value: u32) -> Result<u32> {
    if (1..=128).contains(&value) { Ok(value) } else { bail!("Invalid option: -p {value}") }
}

fn explicit_params(log_n: Option<u8>, r: Option<u32>, p: Option<u32>) -> Result<Option<ExplicitParams>> {
    if log_n.is_none() && r.is_none() && p.is_none() {
        return Ok(None);
    }
    let log_n = log_n.map(validate_log_n).transpose()?.unwrap_or(LOG_N_MIN);
    let r = r.map(validate_r).transpose()?.unwrap_or(DEFAULT_R);
    let p = p.map(validate_p).transpose()?.unwrap_or(DEFAULT_P);
    Ok(Some(ExplicitParams { log_n, r, p }))
}

fn open_input(path: &str) -> Result<Box<dyn Read>> {
    if path == "-" { Ok(Box::new(io::stdin())) } else { Ok(Box::new(file::open_file(Path::new(path))?)) }
}

fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    match path {
        None | Some("-") => Ok(Box::new(io::stdout())),
        Some(path) => Ok(Box::new(file::create_file(Path::new(path))?)),
    }
}

/// Translates the library's typed errors into the user-facing messages
/// `§7`/`§8` require (`Passphrase is incorrect`, etc.), preserving the error
/// as the `anyhow` source chain for everything else.
fn describe(err: ScryptError) -> anyhow::Error {
    match err {
        ScryptError::Passphrase => anyhow!("Passphrase is incorrect"),
        other => anyhow!(other),
    }
}

fn run_enc(args: EncArgs) -> Result<()> {
    let method = resolve_method(&args.budget)?;
    reject_stdin_conflict(&args.infile, &method)?;
    ui::init_logging(args.budget.verbose);

    let explicit = explicit_params(args.log_n, args.r, args.p)?;
    let budget = budget_from_args(&args.budget);
    passphrase::flush_diagnostics();
    let passphrase = passphrase::acquire_for_encrypt(&method)?;

    let mut input = open_input(&args.infile)?;
    let mut output = open_output(args.outfile.as_deref())?;

    let params = session::encrypt(&mut input, &mut output, &passphrase, &budget, explicit, args.budget.force).map_err(describe)?;

    if args.budget.verbose {
        ui::report_params(params);
    }
    ui::print_success("encrypted", Path::new(&args.infile), Path::new(args.outfile.as_deref().unwrap_or("-")));
    Ok(())
}

fn run_dec(args: DecArgs) -> Result<()> {
    let method = resolve_method(&args.budget)?;
    reject_stdin_conflict(&args.infile, &method)?;
    ui::init_logging(args.budget.verbose);

    let budget = budget_from_args(&args.budget);
    passphrase::flush_diagnostics();
    let passphrase = passphrase::acquire_for_decrypt(&method)?;

    let mut input = open_input(&args.infile)?;
    let cookie = session::prep(&mut input, &passphrase, &budget, args.budget.force).map_err(describe)?;

    if args.budget.verbose {
        ui::report_params(cookie.params);
    }

    let mut output = open_output(args.outfile.as_deref())?;
    session::copy(cookie, &mut input, &mut output).map_err(describe).with_context(|| format!("decryption failed for {}", args.infile))?;

    ui::print_success("decrypted", Path::new(&args.infile), Path::new(args.outfile.as_deref().unwrap_or("-")));
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let mut input = open_input(&args.infile)?;
    let params = session::info(&mut input).map_err(describe)?;
    ui::print_info(params);
    Ok(())
}
