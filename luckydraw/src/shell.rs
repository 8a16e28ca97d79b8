//! Line-driven event loop over a [`Session`].
//!
//! Each input line is one user action and runs to completion before the next
//! line is read. After every action the displayed sets and the current status
//! line are written out.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::status::{Clock, Severity};
use crate::io::share::ShareCapability;
use crate::io::sms::SmsTransport;
use crate::io::source::DrawSource;
use crate::session::Session;

const HELP: &str = "\
commands:
  lotto [N]      로또 번호 N세트 생성 (기본 1)
  pension [N]    연금복권 번호 N세트 생성 (기본 1)
  sms <번호>     표시된 번호를 SMS로 전송
  share          표시된 번호를 카카오톡으로 공유
  show           현재 번호와 상태 보기
  help           도움말
  quit           종료";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Lotto(u32),
    Pension(u32),
    Sms(String),
    Share,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();
    let count = |rest: &[&str]| -> Result<u32, String> {
        match rest {
            [] => Ok(1),
            [n] => n
                .parse::<u32>()
                .map_err(|_| format!("세트 수는 숫자로 입력해주세요: {n}")),
            _ => Err(format!("인자가 너무 많아요: {}", rest.join(" "))),
        }
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "lotto" => ShellCommand::Lotto(count(rest.as_slice())?),
        "pension" => ShellCommand::Pension(count(rest.as_slice())?),
        // The phone validator sees everything after the command word.
        "sms" => ShellCommand::Sms(rest.join(" ")),
        "share" => ShellCommand::Share,
        "show" => ShellCommand::Show,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("알 수 없는 명령이에요: {other} (help 참고)")),
    };
    Ok(Some(command))
}

/// Collaborators an interactive session talks to.
pub struct ShellContext<'a> {
    pub source: &'a mut dyn DrawSource,
    pub sms: &'a dyn SmsTransport,
    pub share: &'a dyn ShareCapability,
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellSummary {
    pub actions: u32,
    pub failures: u32,
}

/// Run until `quit` or end of input.
pub fn run_shell<C: Clock, R: BufRead, W: Write>(
    session: &mut Session<C>,
    mut ctx: ShellContext<'_>,
    input: R,
    mut out: W,
) -> Result<ShellSummary> {
    let mut summary = ShellSummary::default();
    write_status(session, &mut out)?;

    for line in input.lines() {
        let line = line.context("read shell input")?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "! {message}").context("write shell output")?;
                continue;
            }
        };
        debug!(?command, "shell command");

        let outcome = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                writeln!(out, "{HELP}").context("write shell output")?;
                continue;
            }
            ShellCommand::Show => {
                write_session(session, &mut out)?;
                continue;
            }
            ShellCommand::Lotto(n) => session.generate_lotto(&mut *ctx.source, n).map(drop),
            ShellCommand::Pension(n) => session
                .generate_pension(&mut *ctx.source, n)
                .map(drop),
            ShellCommand::Sms(phone) => session.send_sms(&phone, ctx.sms),
            ShellCommand::Share => session.share(ctx.share),
        };
        summary.actions += 1;
        if outcome.is_err() {
            summary.failures += 1;
        }
        write_session(session, &mut out)?;
    }
    Ok(summary)
}

/// Write both sections and the status line.
pub fn write_session<C: Clock, W: Write>(session: &mut Session<C>, out: &mut W) -> Result<()> {
    writeln!(out, "[로또]").context("write shell output")?;
    for line in session.render_lotto() {
        writeln!(out, "  {line}").context("write shell output")?;
    }
    writeln!(out, "[연금복권]").context("write shell output")?;
    for line in session.render_pension() {
        writeln!(out, "  {line}").context("write shell output")?;
    }
    write_status(session, out)
}

/// Write only the status line, if one is visible.
pub fn write_status<C: Clock, W: Write>(session: &mut Session<C>, out: &mut W) -> Result<()> {
    if let Some(status) = session.status() {
        let marker = match status.severity {
            Severity::Normal => "*",
            Severity::Error => "!",
        };
        writeln!(out, "{marker} {}", status.text).context("write shell output")?;
    }
    Ok(())
}
