use {
    anyhow::Result,
    std::{
        fs::File,
        path::Path,
        sync::Arc,
    },
    tracing::Level,
    tracing_subscriber::{
        fmt::{
            layer,
            writer::MakeWriterExt,
        },
        layer::SubscriberExt,
        util::SubscriberInitExt,
    },
};

/// Log to `path` and to stdout, each up to its own maximum level.
///
/// Nothing is set up when both levels are `None`.
pub fn setup_logging(
    path: &dyn AsRef<Path>,
    min_level_file: Option<Level>,
    min_level_stdout: Option<Level>,
) -> Result<()> {
    if min_level_file.is_none() && min_level_stdout.is_none() {
        return Ok(());
    }
    let log_file = Arc::new(File::create(path)?);

    tracing_subscriber::registry()
        // File writer
        .with(min_level_file.map(|level| {
            layer()
                .with_writer(log_file.with_max_level(level))
                .with_ansi(false)
        }))
        // Stdout writer
        .with(min_level_stdout.map(|level| {
            layer()
                .with_writer(std::io::stdout.with_max_level(level))
                .compact()
                .pretty()
                .with_line_number(true)
                .with_thread_ids(false)
                .with_target(false)
        }))
        // Create and set Subscriber
        .try_init()?;

    Ok(())
}
