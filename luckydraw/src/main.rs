//! Lottery number generator CLI.
//!
//! Every invocation is one fresh session: generate the requested sets, print
//! them with the status line, and optionally send them on. `shell` keeps one
//! session alive across many actions.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use luckydraw::exit_codes;
use luckydraw::io::config::{DEFAULT_CONFIG_PATH, LuckyConfig, load_config, write_config};
use luckydraw::io::remote::RemoteSource;
use luckydraw::io::share::{DryRunShare, KakaoShare, ShareCapability};
use luckydraw::io::sms::{HttpSmsTransport, LoggingSmsTransport, SmsTransport};
use luckydraw::io::source::{DrawSource, LocalSource};
use luckydraw::logging;
use luckydraw::session::{ActionError, Session};
use luckydraw::shell::{ShellContext, run_shell, write_session, write_status};
use tracing::{debug, info};

const KAKAO_TOKEN_ENV: &str = "LUCKYDRAW_KAKAO_TOKEN";

#[derive(Parser)]
#[command(
    name = "luckydraw",
    version,
    about = "Draw lotto and pension lottery numbers and share them"
)]
struct Cli {
    /// Config file (TOML). Defaults apply when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seed the local generator for reproducible draws.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Fetch draws from a backend serving /generate-lotto and /generate-pension.
    #[arg(long, global = true)]
    remote: Option<String>,

    /// More diagnostics on stderr (-v info, -vv debug). `RUST_LOG` wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    #[command(flatten)]
    Session(SessionCommand),
}

/// Commands that run against a draw session.
#[derive(Subcommand)]
enum SessionCommand {
    /// Draw lotto 6/45 sets.
    Lotto {
        #[arg(short, long, default_value_t = 1)]
        sets: u32,
    },
    /// Draw pension lottery tickets.
    Pension {
        #[arg(short, long, default_value_t = 1)]
        sets: u32,
    },
    /// Draw sets and send them by SMS.
    Sms {
        /// 10-11 digit phone number.
        #[arg(long)]
        phone: String,
        #[command(flatten)]
        draws: DrawArgs,
    },
    /// Draw sets and share them through Kakao.
    Share {
        #[command(flatten)]
        draws: DrawArgs,
        /// Print the share payload instead of sending it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Interactive session reading commands from stdin.
    Shell,
}

#[derive(clap::Args)]
struct DrawArgs {
    /// Lotto sets to draw before sending (0 to skip).
    #[arg(long, default_value_t = 1)]
    lotto: u32,
    /// Pension tickets to draw before sending (0 to skip).
    #[arg(long, default_value_t = 0)]
    pension: u32,
}

fn main() {
    let cli = Cli::parse();
    logging::init(logging::cli_directive(cli.verbose));
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Session(command) => {
            let cfg = resolve_config(&cli.config, cli.seed, cli.remote)?;
            debug!(
                config = %cli.config.display(),
                remote = ?cfg.source.remote_url,
                "config resolved"
            );
            run_session_command(command, &cfg)
        }
    }
}

fn run_session_command(command: SessionCommand, cfg: &LuckyConfig) -> Result<i32> {
    let mut session = Session::new(cfg);
    let mut source = build_source(cfg)?;

    match command {
        SessionCommand::Lotto { sets } => {
            let outcome = session.generate_lotto(&mut source, sets);
            print_session(&mut session)?;
            Ok(exit_code(&outcome))
        }
        SessionCommand::Pension { sets } => {
            let outcome = session.generate_pension(&mut source, sets);
            print_session(&mut session)?;
            Ok(exit_code(&outcome))
        }
        SessionCommand::Sms { phone, draws } => {
            let transport = build_sms(cfg)?;
            let generated =
                generate_for_send(&mut session, source.as_mut(), &draws, &mut io::stdout())?;
            let outcome = session.send_sms(&phone, transport.as_ref());
            print_session(&mut session)?;
            Ok(exit_code(&outcome.and(generated)))
        }
        SessionCommand::Share { draws, dry_run } => {
            let capability = build_share(cfg, dry_run);
            // Keep stdout to the bare payload on a dry run.
            let mut report: Box<dyn Write> = if dry_run {
                Box::new(io::stderr())
            } else {
                Box::new(io::stdout())
            };
            let generated =
                generate_for_send(&mut session, source.as_mut(), &draws, &mut report)?;
            let outcome = session.share(capability.as_ref());
            if !dry_run {
                print_session(&mut session)?;
            }
            Ok(exit_code(&outcome.and(generated)))
        }
        SessionCommand::Shell => {
            let transport = build_sms(cfg)?;
            let capability = build_share(cfg, false);
            let stdin = io::stdin();
            let stdout = io::stdout();
            let summary = run_shell(
                &mut session,
                ShellContext {
                    source: &mut source,
                    sms: transport.as_ref(),
                    share: capability.as_ref(),
                },
                stdin.lock(),
                stdout.lock(),
            )?;
            info!(
                actions = summary.actions,
                failures = summary.failures,
                "shell finished"
            );
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if path.exists() && !force {
        println!("config exists: {}", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &LuckyConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("config written: {}", path.display());
    Ok(exit_codes::OK)
}

/// Load the config file and apply flag and environment overrides.
fn resolve_config(
    path: &Path,
    seed: Option<u64>,
    remote: Option<String>,
) -> Result<LuckyConfig> {
    let mut cfg = load_config(path)?;
    if seed.is_some() {
        cfg.seed = seed;
    }
    if remote.is_some() {
        cfg.source.remote_url = remote;
    }
    if let Ok(token) = std::env::var(KAKAO_TOKEN_ENV) {
        cfg.share.kakao_access_token = Some(token);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_source(cfg: &LuckyConfig) -> Result<Box<dyn DrawSource>> {
    if let Some(url) = &cfg.source.remote_url {
        let timeout = Duration::from_secs(cfg.source.timeout_secs);
        return Ok(Box::new(RemoteSource::new(url, timeout)?));
    }
    Ok(match cfg.seed {
        Some(seed) => Box::new(LocalSource::seeded(seed)),
        None => Box::new(LocalSource::thread_local()),
    })
}

fn build_sms(cfg: &LuckyConfig) -> Result<Box<dyn SmsTransport>> {
    match &cfg.sms.endpoint {
        Some(endpoint) => {
            let timeout = Duration::from_secs(cfg.sms.timeout_secs);
            Ok(Box::new(HttpSmsTransport::new(endpoint, timeout)?))
        }
        None => Ok(Box::new(LoggingSmsTransport)),
    }
}

fn build_share(cfg: &LuckyConfig, dry_run: bool) -> Box<dyn ShareCapability> {
    if dry_run {
        return Box::new(DryRunShare);
    }
    Box::new(KakaoShare::init(&cfg.share))
}

/// Draw what a send command asked for. Counts of zero are skipped.
///
/// A failed draw does not stop the send. Its status goes to `report` right
/// away, before a later action replaces it.
fn generate_for_send<W: Write>(
    session: &mut Session,
    source: &mut dyn DrawSource,
    draws: &DrawArgs,
    report: &mut W,
) -> Result<Result<(), ActionError>> {
    let mut generated = Ok(());
    if draws.lotto > 0 {
        let outcome = session.generate_lotto(source, draws.lotto).map(drop);
        if outcome.is_err() {
            write_status(session, report)?;
        }
        generated = generated.and(outcome);
    }
    if draws.pension > 0 {
        let outcome = session.generate_pension(source, draws.pension).map(drop);
        if outcome.is_err() {
            write_status(session, report)?;
        }
        generated = generated.and(outcome);
    }
    Ok(generated)
}

fn print_session(session: &mut Session) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_session(session, &mut out)?;
    out.flush().context("flush stdout")
}

fn exit_code<T>(outcome: &Result<T, ActionError>) -> i32 {
    match outcome {
        Ok(_) => exit_codes::OK,
        Err(err) => err.exit_code(),
    }
}
