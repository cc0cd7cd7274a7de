//! `conddb` command line interface.
//!
//! ## Commands
//!
//! - `conddb get <PATH>` - payload valid at a time point, with its interval
//! - `conddb boundaries <PATH>` - start points of validity intervals
//! - `conddb commit-time <REV>` - commit time of a revision

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use clap::{Args, Parser, Subcommand};
use conddb_engine::{CondDb, Iov, Key, Resolved, TimePoint, UNBOUNDED_COMMIT_TIME};
use serde_json::json;

pub use config::{CliConfig, OutputFormat};

/// Exit code when nothing is valid at the requested time.
pub const EXIT_NOT_VALID: i32 = 1;

/// Query versioned condition databases
#[derive(Debug, Parser)]
#[command(name = "conddb", version)]
pub struct Cli {
    /// Config file (default: $CONDDB_CONFIG or ~/.config/conddb/conddb.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository: `git:<path>`, `file:<dir>`, `json:<doc-or-path>` or a git path
    #[arg(long, short = 'r', global = true, value_name = "REPO")]
    pub repository: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the payload valid at a time point and its interval of validity
    Get(GetArgs),

    /// Print the start points of every validity interval in a range
    Boundaries(BoundariesArgs),

    /// Print the commit time of a revision
    CommitTime(CommitTimeArgs),
}

/// Time range shared by `get` and `boundaries`
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Start of the range (inclusive)
    #[arg(long, default_value_t = Iov::MIN)]
    pub since: TimePoint,

    /// End of the range (exclusive, default: unbounded)
    #[arg(long)]
    pub until: Option<TimePoint>,
}

impl RangeArgs {
    fn iov(&self) -> Iov {
        Iov::new(self.since, self.until.unwrap_or(Iov::MAX))
    }
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Condition path, e.g. `Conditions/Alignment`
    pub path: String,

    /// Tag, branch or commit (default: `default_tag` from the config)
    #[arg(long)]
    pub tag: Option<String>,

    /// Time point to resolve (default: start of the range)
    #[arg(long, short = 't')]
    pub time: Option<TimePoint>,

    #[command(flatten)]
    pub range: RangeArgs,
}

impl GetArgs {
    fn time_point(&self) -> TimePoint {
        self.time.unwrap_or(self.range.since)
    }
}

#[derive(Debug, Args)]
pub struct BoundariesArgs {
    pub path: String,

    /// Tag, branch or commit (default: `default_tag` from the config)
    #[arg(long)]
    pub tag: Option<String>,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct CommitTimeArgs {
    /// Revision, e.g. a tag name or `HEAD`
    pub revision: String,
}

/// Run `cli` against the repository it names, writing results to `out`.
///
/// Returns the process exit code for successful runs.
pub fn run(cli: Cli, cfg: &CliConfig, out: &mut dyn Write) -> Result<i32> {
    let repository = cli
        .repository
        .as_deref()
        .or(cfg.repository.as_deref())
        .context("no repository given; pass --repository or set `repository` in the config")?;
    let format = cli.format.unwrap_or(cfg.output.format);

    let db = conddb_backends::connect(repository)
        .with_context(|| format!("failed to connect to {repository}"))?;
    let _scope = db.scoped_connection();

    match cli.command {
        Command::Get(args) => {
            let tag = args.tag.as_deref().unwrap_or(&cfg.default_tag);
            get(&db, tag, &args, format, out)
        }
        Command::Boundaries(args) => {
            let tag = args.tag.as_deref().unwrap_or(&cfg.default_tag);
            boundaries(&db, tag, &args, format, out)
        }
        Command::CommitTime(args) => commit_time(&db, &args.revision, format, out),
    }
}

fn iov_json(iov: Iov) -> serde_json::Value {
    json!({
        "since": iov.since,
        "until": (iov.until != Iov::MAX).then_some(iov.until),
    })
}

fn get(
    db: &CondDb,
    tag: &str,
    args: &GetArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<i32> {
    let key = Key::new(tag, args.path.as_str(), args.time_point());
    let resolved = db
        .get_within(&key, args.range.iov())
        .with_context(|| format!("failed to resolve {}", key.object_id()))?;

    match (format, resolved) {
        (OutputFormat::Text, Resolved::Found { data, iov }) => {
            writeln!(out, "{iov}")?;
            out.write_all(&data)?;
            if !data.ends_with(b"\n") {
                writeln!(out)?;
            }
            Ok(0)
        }
        (OutputFormat::Text, Resolved::NotValid) => {
            writeln!(out, "no data valid at {}", key.time_point)?;
            Ok(EXIT_NOT_VALID)
        }
        (OutputFormat::Json, Resolved::Found { data, iov }) => {
            let data = String::from_utf8(data).with_context(|| {
                format!(
                    "payload of {} is not valid UTF-8 and cannot be written as JSON; \
                     use --format text",
                    key.object_id()
                )
            })?;
            let output = json!({
                "found": true,
                "iov": iov_json(iov),
                "data": data,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            Ok(0)
        }
        (OutputFormat::Json, Resolved::NotValid) => {
            let output = json!({ "found": false, "time": key.time_point });
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            Ok(EXIT_NOT_VALID)
        }
    }
}

fn boundaries(
    db: &CondDb,
    tag: &str,
    args: &BoundariesArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<i32> {
    let points = db
        .iov_boundaries(tag, &args.path, args.range.iov())
        .with_context(|| format!("failed to enumerate boundaries of {tag}:{}", args.path))?;

    match format {
        OutputFormat::Text => {
            for point in &points {
                writeln!(out, "{point}")?;
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "tag": tag,
                "path": args.path,
                "boundaries": points,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }
    Ok(0)
}

fn commit_time(
    db: &CondDb,
    revision: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<i32> {
    let time = db
        .commit_time(revision)
        .with_context(|| format!("failed to read commit time of {revision}"))?;
    let rendered =
        (time != UNBOUNDED_COMMIT_TIME).then(|| time.to_rfc3339_opts(SecondsFormat::Secs, true));

    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", rendered.as_deref().unwrap_or("unbounded"))?;
        }
        OutputFormat::Json => {
            let output = json!({ "revision": revision, "commit_time": rendered });
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"json:{"Cond": {"IOVs": "0 v0\n100 group\n200 v2\n", "v0": "data 0", "v1": "data 1", "v2": "data 2", "group": {"IOVs": "50 ../v1"}}}"#;

    fn run_args(args: &[&str]) -> (i32, String) {
        let cli = Cli::try_parse_from(
            ["conddb", "--repository", DOCUMENT]
                .iter()
                .chain(args)
                .copied(),
        )
        .expect("parse arguments");
        let mut out = Vec::new();
        let code = run(cli, &CliConfig::default(), &mut out).expect("run");
        (code, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn get_prints_interval_then_payload() {
        assert_eq!(
            run_args(&["get", "Cond", "--time", "110"]),
            (0, "[100, 200)\ndata 1\n".to_string())
        );
        assert_eq!(
            run_args(&["get", "Cond", "-t", "210"]),
            (0, "[200, MAX)\ndata 2\n".to_string())
        );
    }

    #[test]
    fn get_outside_range_exits_not_valid() {
        assert_eq!(
            run_args(&["get", "Cond", "--time", "210", "--until", "200"]),
            (EXIT_NOT_VALID, "no data valid at 210\n".to_string())
        );
    }

    #[test]
    fn get_time_defaults_to_range_start() {
        assert_eq!(
            run_args(&["get", "Cond", "--since", "150"]),
            (0, "[150, 200)\ndata 1\n".to_string())
        );
        assert_eq!(
            run_args(&["get", "Cond"]),
            (0, "[0, 100)\ndata 0\n".to_string())
        );
    }

    #[test]
    fn json_output_rejects_non_utf8_payload() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Blob"), [0xff, 0xfe, 0x00]).expect("write");
        let repository = format!("file:{}", dir.path().display());

        let cli = Cli::try_parse_from([
            "conddb",
            "-r",
            repository.as_str(),
            "get",
            "Blob",
            "--format",
            "json",
        ])
        .expect("parse arguments");
        let err = run(cli, &CliConfig::default(), &mut Vec::new()).expect_err("binary payload");
        assert!(err.to_string().contains("is not valid UTF-8"));

        let cli = Cli::try_parse_from(["conddb", "-r", repository.as_str(), "get", "Blob"])
            .expect("parse arguments");
        let mut out = Vec::new();
        assert_eq!(run(cli, &CliConfig::default(), &mut out).expect("run"), 0);
        assert!(out.ends_with(&[0xff, 0xfe, 0x00, b'\n']));
    }

    #[test]
    fn get_as_json() {
        let (code, out) = run_args(&["get", "Cond", "--time", "210", "--format", "json"]);
        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(
            value,
            json!({"found": true, "iov": {"since": 200, "until": null}, "data": "data 2"})
        );
    }

    #[test]
    fn boundaries_text_and_json() {
        assert_eq!(
            run_args(&["boundaries", "Cond"]),
            (0, "0\n100\n200\n".to_string())
        );

        let (_, out) = run_args(&["boundaries", "Cond", "--since", "150", "--format", "json"]);
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["boundaries"], json!([150, 200]));
        assert_eq!(value["tag"], json!("HEAD"));
    }

    #[test]
    fn commit_time_without_history_is_unbounded() {
        assert_eq!(
            run_args(&["commit-time", "HEAD"]),
            (0, "unbounded\n".to_string())
        );
    }

    #[test]
    fn flag_overrides_config_repository() {
        let cfg = CliConfig {
            repository: Some("file:/definitely/not/here".to_string()),
            default_tag: "v1".to_string(),
            ..CliConfig::default()
        };
        let cli = Cli::try_parse_from(["conddb", "-r", DOCUMENT, "boundaries", "Cond"])
            .expect("parse arguments");
        let mut out = Vec::new();
        assert_eq!(run(cli, &cfg, &mut out).expect("run"), 0);
    }

    #[test]
    fn missing_repository_is_an_error() {
        let cli = Cli::try_parse_from(["conddb", "commit-time", "HEAD"]).expect("parse arguments");
        let err = run(cli, &CliConfig::default(), &mut Vec::new()).expect_err("no repository");
        assert!(err.to_string().contains("no repository given"));
    }
}
