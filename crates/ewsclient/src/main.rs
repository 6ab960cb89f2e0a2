//! `ews-email` - drafts, attaches and sends mail through Exchange Web Services.
//!
//! Every step prints its buffered diagnostics as it completes, so a failed
//! run still shows what the server and the local builders had to say.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use chrono::Local;
use clap::{ArgGroup, Parser};
use ewsclient_core::{Session, SessionConfig};
use ewsclient_schema::Diagnostic;
use ewsclient_soap::{
    AttachmentSet, BodyFormat, Diagnostics, EmailDraft, Finalized, Importance, ItemId, Level,
    LogEntry, ResponseSummary, Sensitivity, Stage,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = "ews-email";

#[derive(Parser, Debug)]
#[command(name = PROGRAM, version)]
#[command(about = "Draft, attach and send mail through Exchange Web Services")]
#[command(group(ArgGroup::new("endpoint").required(true).args(["server", "autodiscover"])))]
struct Cli {
    /// EWS server (host name or full endpoint URL)
    #[arg(short = 's', long, value_name = "SERVER")]
    server: Option<String>,

    /// Find the EWS endpoint through Office 365 autodiscovery
    #[arg(long)]
    autodiscover: bool,

    /// Account name, also used as the sender address
    #[arg(short = 'u', long = "user", value_name = "USERNAME")]
    user: String,

    /// Account password
    #[arg(short = 'p', long, env = "EWS_PASSWORD", hide_env_values = true)]
    password: String,

    /// To recipient (repeatable)
    #[arg(long, value_name = "TO")]
    to: Vec<String>,

    /// Cc recipient (repeatable)
    #[arg(long, value_name = "CC")]
    cc: Vec<String>,

    /// Bcc recipient (repeatable)
    #[arg(long, value_name = "BCC")]
    bcc: Vec<String>,

    /// Subject line
    #[arg(long)]
    subject: Option<String>,

    /// Message body
    #[arg(long)]
    body: String,

    /// File to attach (repeatable)
    #[arg(long = "attach", value_name = "PATH")]
    attachments: Vec<PathBuf>,

    /// Body format: plain or html
    #[arg(long, default_value = "plain")]
    format: BodyFormat,

    /// Normal, Personal, Private or Confidential
    #[arg(long, value_name = "LEVEL", default_value = "Normal")]
    sensitivity: Sensitivity,

    /// Low, Normal or High
    #[arg(long, value_name = "LEVEL", default_value = "Normal")]
    importance: Importance,

    /// Request a delivery receipt
    #[arg(long)]
    delivery_receipt: bool,

    /// Request a read receipt
    #[arg(long)]
    read_receipt: bool,

    /// Save the draft marked as read (IsRead=true); without it no IsRead is sent
    #[arg(long)]
    mark_read: bool,

    /// Send the draft and keep a copy in Sent Items
    #[arg(long)]
    send: bool,

    /// Verbosity from 0 (quiet) to 5 (trace)
    #[arg(short = 'l', long, value_name = "LEVEL", default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..=5))]
    log_level: u8,
}

impl Cli {
    fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut builder = SessionConfig::builder(&self.user, &self.password);
        if let Some(server) = &self.server {
            builder = builder.server(endpoint_url(server));
        }
        builder.build().context("invalid session configuration")
    }

    fn draft(&self) -> EmailDraft {
        let mut draft = EmailDraft::new()
            .with_format(self.format)
            .with_sender(&self.user)
            .with_to(&self.to)
            .with_cc(&self.cc)
            .with_bcc(&self.bcc)
            .with_body(&self.body)
            .with_sensitivity(self.sensitivity)
            .with_importance(self.importance)
            .with_delivery_receipt(self.delivery_receipt)
            .with_read_receipt(self.read_receipt);
        if let Some(subject) = &self.subject {
            draft = draft.with_subject(subject);
        }
        // Opt-in: marks the saved draft read rather than explicitly unread.
        if self.mark_read {
            draft = draft.with_is_read(true);
        }
        draft
    }

    const fn verbose(&self) -> bool {
        self.log_level > 0
    }
}

/// Expands a bare host name to the standard EWS endpoint.
fn endpoint_url(server: &str) -> String {
    if server.contains("://") {
        server.to_string()
    } else {
        format!("https://{}/EWS/Exchange.asmx", server.trim_end_matches('/'))
    }
}

fn init_tracing(log_level: u8) {
    let default = match log_level {
        0 => "warn",
        1..=3 => "info",
        4 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match run(&cli) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string();
            println!("{timestamp:26} | {PROGRAM} | ERROR | {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<&'static str> {
    let console = Console::new(cli.log_level);
    let config = cli.session_config()?;
    info!(user = %config.username(), "starting {PROGRAM}");
    let mut session = Session::open(config).context("failed to create HTTP client")?;
    let result = deliver(cli, &console, &mut session);
    console.show(session.diagnostics());
    result
}

fn deliver(cli: &Cli, console: &Console, session: &mut Session) -> anyhow::Result<&'static str> {
    session.connect().context("EWS connectivity issues")?;
    console.flush(session);

    let draft = cli.draft();
    if cli.verbose() {
        console.fields("email", &draft.fields());
    }
    let pending = draft.diagnostics().clone();
    let finalized = console
        .finalized("email", &pending, draft.finalize())
        .context("local email drafting issues")?;
    if cli.verbose() {
        println!("{}", finalized.request);
    }
    console.show(&finalized.diagnostics);

    session
        .submit(&finalized.request, Stage::Draft)
        .context("EWS endpoint email submission issues")?;
    console.flush(session);
    let Some(item) = session.item().cloned() else {
        bail!("EWS endpoint responded without an item Id or ChangeKey");
    };
    debug!(item = %item, "draft saved");

    if !cli.attachments.is_empty() {
        let attachments = collect_attachments(item, &cli.attachments);
        if cli.verbose() {
            let names: Vec<_> = attachments
                .iter()
                .map(|a| format!("name => {}", a.name))
                .collect();
            console.fields("attachment", &names);
        }
        if attachments.diagnostics().has_errors() {
            console.show(attachments.diagnostics());
            bail!("local attachment processing issues");
        }
        let expected = attachments.len();
        let pending = attachments.diagnostics().clone();
        let finalized = console
            .finalized("attachment", &pending, attachments.finalize())
            .context("local attachment processing issues")?;
        if cli.verbose() {
            println!("{}", finalized.request);
        }
        console.show(&finalized.diagnostics);

        let submission = session
            .submit(&finalized.request, Stage::Attachment)
            .context("EWS endpoint attachment submission issues")?;
        console.flush(session);
        check_attachments(expected, &submission.summary)?;
    }

    if !cli.send {
        return Ok("email draft was saved");
    }
    let submission = session
        .send_and_save()
        .context("EWS endpoint send issues")?;
    console.flush(session);
    if !submission.summary.sent {
        bail!("EWS endpoint did not confirm the message was sent");
    }
    Ok("email was sent successfully")
}

fn collect_attachments(item: ItemId, paths: &[PathBuf]) -> AttachmentSet {
    let mut attachments = AttachmentSet::new(item);
    for path in paths {
        attachments.add_file(path);
    }
    attachments
}

/// Fails unless the endpoint returned an id for every submitted attachment.
fn check_attachments(expected: usize, summary: &ResponseSummary) -> anyhow::Result<()> {
    let created = summary.attachment_ids.len();
    if created < expected {
        bail!("EWS endpoint created {created} of {expected} attachment(s)");
    }
    Ok(())
}

/// Prints diagnostics at or above a threshold.
///
/// Request and response dumps are DEBUG entries, so they only appear from
/// log level 4 up.
struct Console {
    threshold: Level,
}

impl Console {
    const fn new(log_level: u8) -> Self {
        let threshold = if log_level >= 4 { Level::Debug } else { Level::Info };
        Self { threshold }
    }

    fn show(&self, diagnostics: &Diagnostics) {
        for entry in diagnostics {
            self.print(entry);
        }
    }

    fn flush(&self, session: &mut Session) {
        self.show(session.diagnostics());
        session.clear_diagnostics();
    }

    fn print(&self, entry: &LogEntry) {
        if entry.level >= self.threshold {
            println!("{entry}");
        }
    }

    fn fields(&self, origin: &str, fields: &[String]) {
        for field in fields {
            self.print(&entry(origin, Level::Info, format!("field {field}")));
        }
    }

    /// Passes a finalized request through, printing what the builder logged
    /// when it failed.
    fn finalized(
        &self,
        origin: &str,
        pending: &Diagnostics,
        result: ewsclient_soap::Result<Finalized>,
    ) -> ewsclient_soap::Result<Finalized> {
        if let Err(err) = &result {
            self.show(pending);
            if let ewsclient_soap::Error::InvalidRequest { diagnostics } = err {
                for diagnostic in diagnostics {
                    self.print(&validator_entry(origin, diagnostic));
                }
            }
        }
        result
    }
}

fn entry(origin: &str, level: Level, message: String) -> LogEntry {
    LogEntry {
        timestamp: Local::now(),
        origin: origin.to_string(),
        level,
        message,
    }
}

fn validator_entry(origin: &str, diagnostic: &Diagnostic) -> LogEntry {
    entry(origin, diagnostic.severity.into(), diagnostic.message.clone())
}
