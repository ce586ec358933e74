use crate::logging::config::LoggingConfig;
use crate::Result;
use anyhow::{anyhow, Context};
use std::fs::{create_dir_all, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{self as tracing_fmt, format, writer::BoxMakeWriter};
use tracing_subscriber::registry::LookupSpan;

const LOG_FILE: &str = "flowdoc.log";

/// Layer type produced by the file sink builder.
pub type FileFmtLayer<S> =
    tracing_fmt::Layer<S, format::DefaultFields, format::Format<format::Full>, BoxMakeWriter>;

/// Layer stack that already wraps the provided subscriber.
pub type FileLayerStack<S> = tracing_subscriber::layer::Layered<FileFmtLayer<S>, S>;

/// Where the log file lives for a catalog.
///
/// Defaults to `<root>/.flowdoc/logs`. A relative `log_dir` is taken from the
/// catalog root and must stay inside it; an absolute one is used as given.
/// Either way the directory may not sit inside `workflows_dir`, where catalog
/// discovery would pick it up as a category.
pub fn log_file_path(
    config: &LoggingConfig,
    catalog_root: &Path,
    workflows_dir: &Path,
) -> Result<PathBuf> {
    let root = canonical(catalog_root);
    let directory = match &config.log_dir {
        Some(custom) if custom.is_absolute() => canonical(custom),
        Some(custom) => {
            let directory = canonical(&root.join(custom));
            if !directory.starts_with(&root) {
                return Err(anyhow!(
                    "logging.log_dir resolves outside catalog root {}",
                    root.display()
                ));
            }
            directory
        }
        None => root.join(".flowdoc").join("logs"),
    };

    let workflows = canonical(workflows_dir);
    if directory.starts_with(&workflows) {
        return Err(anyhow!(
            "logging.log_dir may not be inside the workflows directory {}",
            workflows.display()
        ));
    }
    Ok(directory.join(LOG_FILE))
}

/// Build a tracing layer that writes to the provided file path via a non-blocking writer.
pub fn file_layer<S>(
    log_file: &Path,
    enabled: bool,
) -> Result<(FileFmtLayer<S>, Option<WorkerGuard>)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if !enabled {
        return Ok((make_layer(BoxMakeWriter::new(io::sink)), None));
    }

    let directory = log_file
        .parent()
        .ok_or_else(|| anyhow!("log file path {} has no parent directory", log_file.display()))?;
    create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let writer = BoxMakeWriter::new(move || non_blocking.clone());
    Ok((make_layer(writer), Some(guard)))
}

fn make_layer<S>(writer: BoxMakeWriter) -> FileFmtLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
}

// Directories that do not exist yet keep their joined spelling.
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
