use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Builds the process logger: `<timestamp> <LEVEL> <message>` lines, appended
/// to `log_file` when one is given, stderr otherwise. `RUST_LOG` wins over
/// `default_level`.
pub fn builder(default_level: &str, log_file: Option<&Path>) -> std::io::Result<Builder> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        let now = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "-".to_string());
        writeln!(buf, "{} {:<5} {}", now, record.level(), record.args())
    });

    if let Some(path) = log_file {
        builder.target(Target::Pipe(Box::new(open_append(path)?)));
    }

    Ok(builder)
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
