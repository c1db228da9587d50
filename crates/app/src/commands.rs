use std::io::Write;
use std::path::Path;

use editor_core::diff_package::Side;
use editor_core::position::LineSpan;
use editor_state::{BufferId, Mode, Session};

use crate::config::{Command, ComparisonPolicy, WorkbenchConfig};
use crate::errors::{AppError, AppResult};

/// Runs one subcommand, writing its report to `out`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, or if the session
/// rejects the operation.
pub fn run(config: &WorkbenchConfig, command: Command, out: &mut dyn Write) -> AppResult<()> {
    match command {
        Command::Detect { file } => detect(config, &file, out),
        Command::Symbols { file } => symbols(config, &file, out),
        Command::Definition { file, line } => definition(config, &file, line, out),
        Command::References { file, line } => references(config, &file, line, out),
        Command::Pack {
            original,
            modified,
            output,
        } => pack(config, &original, &modified, output.as_deref(), out),
        Command::Unpack {
            file,
            original_out,
            modified_out,
        } => unpack(
            config,
            &file,
            original_out.as_deref(),
            modified_out.as_deref(),
            out,
        ),
        Command::Convert { file, to, output } => {
            convert(config, &file, to, output.as_deref(), out)
        }
    }
}

fn open(config: &WorkbenchConfig, path: &Path, mut prompt: ComparisonPolicy) -> AppResult<Session> {
    let mut session = Session::new()?;
    session.open_path(path, &mut prompt)?;
    apply_overrides(config, &mut session);
    Ok(session)
}

fn apply_overrides(config: &WorkbenchConfig, session: &mut Session) {
    if let Some(language) = &config.language {
        session.set_language(language);
    }
    if let Some(encoding) = config.encoding {
        session.set_encoding(encoding);
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Single => "single",
        Mode::Comparison => "comparison",
    }
}

fn check_line(session: &Session, buffer: BufferId, line: usize) -> AppResult<()> {
    let line_count = session.document(buffer).map_or(0, |doc| doc.line_count());
    if line == 0 || line > line_count {
        return Err(AppError::LineOutOfRange(line));
    }
    Ok(())
}

fn write_span(
    out: &mut dyn Write,
    session: &Session,
    buffer: BufferId,
    span: LineSpan,
) -> AppResult<()> {
    let text = session
        .document(buffer)
        .and_then(|doc| doc.line(span.line))
        .unwrap_or_default();
    writeln!(
        out,
        "{}:{}-{}\t{}",
        span.line,
        span.start_column,
        span.end_column,
        text.trim()
    )?;
    Ok(())
}

fn detect(config: &WorkbenchConfig, path: &Path, out: &mut dyn Write) -> AppResult<()> {
    let session = open(config, path, config.comparison)?;
    writeln!(
        out,
        "{}\t{}\t{}",
        session.encoding(),
        session.language(),
        mode_label(session.mode())
    )?;
    Ok(())
}

fn symbols(config: &WorkbenchConfig, path: &Path, out: &mut dyn Write) -> AppResult<()> {
    let session = open(config, path, config.comparison)?;
    for symbol in session.symbols(session.target_buffer()) {
        let range = symbol.line_range();
        writeln!(out, "{}-{}\t{}", range.start(), range.end(), symbol.name)?;
    }
    Ok(())
}

fn definition(
    config: &WorkbenchConfig,
    path: &Path,
    line: usize,
    out: &mut dyn Write,
) -> AppResult<()> {
    let session = open(config, path, config.comparison)?;
    let buffer = session.target_buffer();
    check_line(&session, buffer, line)?;

    match session.definition(buffer, line) {
        Some(span) => write_span(out, &session, buffer, span),
        None => {
            tracing::info!(line, "no definition found");
            Ok(())
        }
    }
}

fn references(
    config: &WorkbenchConfig,
    path: &Path,
    line: usize,
    out: &mut dyn Write,
) -> AppResult<()> {
    let session = open(config, path, config.comparison)?;
    let buffer = session.target_buffer();
    check_line(&session, buffer, line)?;

    for span in session.references(buffer, line) {
        write_span(out, &session, buffer, span)?;
    }
    Ok(())
}

/// Loads `original`, enters comparison mode so it becomes the original side,
/// then loads `modified` over the modified side.
fn pack(
    config: &WorkbenchConfig,
    original: &Path,
    modified: &Path,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> AppResult<()> {
    let mut session = Session::new()?;
    let mut prompt = ComparisonPolicy::No;
    session.open_path(original, &mut prompt)?;
    session.toggle_mode();
    session.open_path(modified, &mut prompt)?;
    apply_overrides(config, &mut session);

    let written = session.save_to(output)?;
    writeln!(out, "{}", written.display())?;
    Ok(())
}

fn unpack(
    config: &WorkbenchConfig,
    path: &Path,
    original_out: Option<&Path>,
    modified_out: Option<&Path>,
    out: &mut dyn Write,
) -> AppResult<()> {
    let session = open(config, path, ComparisonPolicy::Yes)?;
    if session.mode() != Mode::Comparison {
        return Err(AppError::NotAPackage(path.display().to_string()));
    }

    let sides = [
        (Side::Original, BufferId::Original, original_out),
        (Side::Modified, BufferId::Modified, modified_out),
    ];
    for (side, buffer, target) in sides {
        let text = session.text(buffer).unwrap_or_default();
        match target {
            Some(target) => {
                let bytes = editor_core::encoding::encode(&text, session.encoding());
                io::write_atomic(target, &bytes)?;
                writeln!(out, "{side}\t{}", target.display())?;
            }
            None => {
                writeln!(out, "--- {side}")?;
                writeln!(out, "{text}")?;
            }
        }
    }
    Ok(())
}

fn convert(
    config: &WorkbenchConfig,
    path: &Path,
    to: editor_core::encoding::TextEncoding,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> AppResult<()> {
    let mut session = open(config, path, ComparisonPolicy::No)?;
    let from = session.encoding();
    session.set_encoding(to);

    let written = session.save_to(Some(output.unwrap_or(path)))?;
    tracing::info!(%from, %to, path = %written.display(), "converted");
    writeln!(out, "{}", written.display())?;
    Ok(())
}
