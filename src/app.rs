use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::commands::{self, Input};
use crate::cli::validation;
use crate::columns::ColumnToggles;
use crate::config::{self, ConfigFile};
use crate::detail::DetailPolicy;
use crate::events::{Command, Completion, UiEvent};
use crate::feed::{Narrowing, DEFAULT_PAGE_SIZE};
use crate::layout::Orientation;
use crate::model::RecordId;
use crate::output::dashboard::{self, Viewport};
use crate::output::{self, OutputFormat};
use crate::session::{Session, SessionError, SessionOptions};
use crate::source::{self, HttpThingSource, SourceOptions, ThingSource};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    Interactive,
    Page {
        page: u64,
        export: Option<(String, OutputFormat)>,
    },
    Show(RecordId),
    Types,
}

#[derive(Clone, Debug)]
struct RunConfig {
    mode: Mode,
    source: SourceOptions,
    session: SessionOptions,
    no_color: bool,
    verbose: u8,
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let source = SourceOptions {
        base_url: args
            .base_url
            .or(cfg.base_url)
            .unwrap_or_else(|| source::DEFAULT_BASE_URL.to_string()),
        thing_path: args
            .thing_path
            .or(cfg.thing_path)
            .unwrap_or_else(|| source::DEFAULT_THING_PATH.to_string()),
        timeout_seconds: args.timeout.or(cfg.timeout).unwrap_or(30),
        proxy: args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty()),
    };
    source::thing_root(&source.base_url, &source.thing_path).map_err(|e| e.to_string())?;

    let page_size = args.page_size.or(cfg.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        return Err("invalid page_size 0 in config, expected positive integer".to_string());
    }

    let columns = match (args.columns.as_deref(), cfg.columns.as_ref()) {
        (Some(raw), _) => ColumnToggles::parse_csv(raw)
            .map_err(|e| format!("invalid --columns '{raw}': {e}"))?,
        (None, Some(names)) => {
            ColumnToggles::from_names(names).map_err(|e| format!("invalid config columns: {e}"))?
        }
        (None, None) => ColumnToggles::default(),
    };

    let detail_policy_raw = args
        .detail_policy
        .or(cfg.detail_policy)
        .unwrap_or_else(|| "last-resolved".to_string());
    let detail_policy = DetailPolicy::parse(&detail_policy_raw)
        .ok_or_else(|| format!("invalid detail policy '{detail_policy_raw}'"))?;

    let orientation = match args.orientation.or(cfg.orientation) {
        Some(raw) => Orientation::parse(&raw).map_err(|e| e.to_string())?,
        None => Orientation::default(),
    };

    let narrowing = Narrowing {
        status: args.status.or(cfg.status),
        authority: args
            .authority
            .or(cfg.authority)
            .filter(|a| !a.trim().is_empty()),
    };

    let mode = if let Some(page) = args.page {
        let export = match args.export {
            Some(path) => {
                let format = match args.export_format.as_deref() {
                    Some(raw) => OutputFormat::parse(raw),
                    None => output::infer_format_from_path(&path),
                }
                .unwrap_or(OutputFormat::Text);
                Some((path, format))
            }
            None => None,
        };
        Mode::Page { page, export }
    } else if let Some(id) = args.show {
        Mode::Show(RecordId::new(id.trim()))
    } else if args.types {
        Mode::Types
    } else {
        Mode::Interactive
    };

    Ok(RunConfig {
        mode,
        source,
        session: SessionOptions {
            page_size,
            narrowing,
            columns,
            detail_policy,
            orientation,
        },
        no_color,
        verbose: args.verbose,
    })
}

fn log_filter(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directive = match verbose {
        0 => "warn",
        1 => "thingview=info,warn",
        2 => "thingview=debug,info",
        _ => "trace",
    };
    EnvFilter::new(directive)
}

fn init_tracing(verbose: u8, no_color: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .compact()
        .try_init();
}

fn viewport_from_env() -> Viewport {
    let read = |key: &str| {
        std::env::var(key)
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
            .filter(|v| *v > 0)
    };
    let fallback = Viewport::default();
    Viewport {
        width: read("COLUMNS").unwrap_or(fallback.width),
        height: read("LINES").unwrap_or(fallback.height),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn run_page(
    run: &RunConfig,
    source: &dyn ThingSource,
    page: u64,
    export: Option<&(String, OutputFormat)>,
) -> Result<(), String> {
    let mut session = Session::new(run.session.clone()).map_err(|e| e.to_string())?;
    let commands = session
        .handle(UiEvent::PageRequested { page })
        .map_err(|e| e.to_string())?;
    let pb = spinner(&format!("loading page {page}"));
    for command in commands {
        let done = source::execute(source, command).await;
        session.complete(done);
    }
    pb.finish_and_clear();

    if let Some(err) = session.feed().last_error() {
        return Err(err.to_string());
    }

    match export {
        Some((path, format)) => {
            let bytes = output::export_rows(session.grid(), *format)?;
            tokio::fs::write(path, bytes)
                .await
                .map_err(|e| format!("failed to write '{path}': {e}"))?;
            format_kv_line("Exported", path);
        }
        None => {
            let viewport = viewport_from_env();
            println!("{}", dashboard::render_status(session.feed()));
            for line in dashboard::render_grid(
                session.grid(),
                None,
                usize::MAX,
                usize::from(viewport.width),
            ) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

async fn run_show(source: &dyn ThingSource, id: &RecordId) -> Result<(), String> {
    let pb = spinner(&format!("loading {id}"));
    let doc = source.get(id).await;
    pb.finish_and_clear();
    let doc = doc.map_err(|e| e.to_string())?;
    let pretty = serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?;
    println!("{pretty}");
    Ok(())
}

async fn run_types(source: &dyn ThingSource) -> Result<(), String> {
    let pb = spinner("loading types");
    let types = source.types().await;
    pb.finish_and_clear();
    let types = types.map_err(|e| e.to_string())?;
    print!("{}", output::render_types(&types));
    Ok(())
}

fn report_error(err: &SessionError) {
    match err {
        SessionError::NoSelection => println!("{} {}", "[!]".red().bold(), err.to_string().red()),
        other => println!("{} {}", "[-]".yellow().bold(), other),
    }
}

fn prompt() {
    use std::io::Write;
    print!("{} ", "thingview>".bold());
    let _ = std::io::stdout().flush();
}

/// Feeds a batch of events through the session, stopping at the first error.
fn dispatch(session: &mut Session, events: Vec<UiEvent>) -> Vec<Command> {
    let mut out = Vec::new();
    for event in events {
        match session.handle(event) {
            Ok(commands) => out.extend(commands),
            Err(e) => {
                report_error(&e);
                break;
            }
        }
    }
    out
}

async fn run_interactive(run: &RunConfig, source: &dyn ThingSource) -> Result<(), String> {
    let mut session = Session::new(run.session.clone()).map_err(|e| e.to_string())?;
    let mut inflight = FuturesUnordered::new();
    for command in session.start().map_err(|e| e.to_string())? {
        inflight.push(source::execute(source, command));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", commands::HELP.dimmed());
    prompt();

    loop {
        tokio::select! {
            Some(done) = inflight.next(), if !inflight.is_empty() => {
                let types_done = matches!(done, Completion::Types { .. });
                session.complete(done);
                println!();
                if types_done {
                    match (session.types(), session.types_error()) {
                        (_, Some(err)) => println!("{}", err.red()),
                        (Some(types), None) => print!("{}", output::render_types(types)),
                        (None, None) => {}
                    }
                } else {
                    println!("{}", dashboard::render(&session, viewport_from_env()));
                }
                prompt();
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => return Err(format!("failed to read input: {e}")),
                };
                let input = match commands::parse(&line) {
                    Ok(input) => input,
                    Err(e) => {
                        println!("{}", e.yellow());
                        prompt();
                        continue;
                    }
                };
                let events = match input {
                    Input::Quit => break,
                    Input::Empty => Vec::new(),
                    Input::Help => {
                        println!("{}", commands::HELP);
                        Vec::new()
                    }
                    Input::Show => {
                        println!("{}", dashboard::render(&session, viewport_from_env()));
                        Vec::new()
                    }
                    Input::Save(path) => {
                        let format = output::infer_format_from_path(&path).unwrap_or(OutputFormat::Text);
                        match output::export_rows(session.grid(), format) {
                            Ok(bytes) => match tokio::fs::write(&path, bytes).await {
                                Ok(()) => format_kv_line("Saved", &path),
                                Err(e) => println!("{}", format!("failed to write '{path}': {e}").red()),
                            },
                            Err(e) => println!("{}", e.red()),
                        }
                        Vec::new()
                    }
                    Input::Row(n) => match session.grid().visible_row(n).and_then(|r| r.id()) {
                        Some(id) => vec![UiEvent::RowSelected { id }],
                        None => {
                            println!("{}", format!("no row {n}").yellow());
                            Vec::new()
                        }
                    },
                    Input::Status(status) => vec![UiEvent::NarrowingChanged {
                        status,
                        authority: session.feed().narrowing().authority.clone(),
                    }],
                    Input::Authority(authority) => vec![UiEvent::NarrowingChanged {
                        status: session.feed().narrowing().status,
                        authority,
                    }],
                    Input::Events(events) => events,
                };
                let redraw = !events.is_empty();
                let issued = dispatch(&mut session, events);
                debug!(commands = issued.len(), "input handled");
                let fetching = !issued.is_empty();
                for command in issued {
                    inflight.push(source::execute(source, command));
                }
                if redraw && !fetching {
                    println!("{}", dashboard::render(&session, viewport_from_env()));
                }
                prompt();
            }
        }
    }

    if !inflight.is_empty() {
        debug!(pending = inflight.len(), "leaving with fetches still in flight");
    }
    println!();
    format_kv_line("Logged out", &format!("{} issue(s) filed", session.issues().len()));
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let source = HttpThingSource::new(&run.source).map_err(|e| e.to_string())?;
    debug!(root = %source.root(), "thing source ready");

    match &run.mode {
        Mode::Page { page, export } => run_page(&run, &source, *page, export.as_ref()).await,
        Mode::Show(id) => run_show(&source, id).await,
        Mode::Types => run_types(&source).await,
        Mode::Interactive => {
            format_kv_line("Source", source.root().as_str());
            format_kv_line("Page size", &run.session.page_size.to_string());
            format_kv_line("Detail", run.session.detail_policy.label());
            run_interactive(&run, &source).await
        }
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", CliArgs::command().render_long_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose, args.no_color && !args.color);

    let interactive = args.page.is_none() && args.show.is_none() && !args.types;
    let cfg = match args.config.as_deref().map(config::expand_tilde) {
        Some(path) => config::load_config(&path, false)?,
        None => match config::default_config_path() {
            Some(path) => {
                if interactive {
                    if let Err(e) = config::ensure_default_config_file(&path) {
                        warn!(error = %e, "could not write default config");
                    }
                }
                config::load_config(&path, true)?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    debug!(verbose = run.verbose, mode = ?run.mode, "configuration resolved");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
