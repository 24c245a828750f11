use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use congruence_rs::{
    interview_id_for, load_face_series, load_manual_labels, load_segments, validate_report,
    ManualLabel, SyncConfig, Synchronizer, SynchronizerBuilder, WindowPolicy,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[path = "congruence_report/json_report_formatter.rs"]
mod json_report_formatter;
#[path = "congruence_report/text_grid_report_formatter.rs"]
mod text_grid_report_formatter;

const SEGMENTS_SUFFIX: &str = "_segments.json";
const FACES_SUFFIX: &str = "_faces.csv";
const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "mov", "avi"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    #[value(name = "textgrid")]
    TextGrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WindowPolicyChoice {
    Simple,
    WeightedRecency,
}

impl WindowPolicyChoice {
    fn window_policy(self) -> WindowPolicy {
        match self {
            Self::Simple => WindowPolicy::SimpleMode,
            Self::WeightedRecency => WindowPolicy::WeightedRecencyMode,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "congruence_report")]
#[command(about = "Fuse speech sentiment and facial expression series into congruence reports")]
struct Args {
    /// Directory holding `<id>_segments.json` and `<id>_faces.csv` pairs.
    #[arg(
        long,
        env = "CONGRUENCE_REPORT_DATASET_ROOT",
        default_value = "test-data/interviews"
    )]
    dataset_root: PathBuf,
    #[arg(long, env = "CONGRUENCE_REPORT_OUT_DIR", default_value = "reports")]
    out_dir: PathBuf,
    #[arg(long, env = "CONGRUENCE_REPORT_CASES_FILE")]
    cases_file: Option<PathBuf>,
    #[arg(long, env = "CONGRUENCE_REPORT_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "CONGRUENCE_REPORT_OFFSET", default_value_t = 0)]
    offset: usize,
    /// JSON file with synchronizer settings.
    #[arg(long, env = "CONGRUENCE_REPORT_CONFIG")]
    config: Option<PathBuf>,
    /// Overrides the window policy from --config.
    #[arg(long, env = "CONGRUENCE_REPORT_WINDOW_POLICY", value_enum)]
    window_policy: Option<WindowPolicyChoice>,
    #[arg(
        long,
        env = "CONGRUENCE_REPORT_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    output_format: OutputFormat,
    /// Manual label sheet (`video_id,start_time_sec,manual_congruence`).
    #[arg(long, env = "CONGRUENCE_REPORT_MANUAL_LABELS")]
    manual_labels: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone)]
struct Case {
    id: String,
    segments_path: PathBuf,
    faces_path: PathBuf,
    video_path: Option<PathBuf>,
}

fn main() {
    if let Err(message) = run() {
        tracing::error!("{message}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match args.config.as_ref() {
        Some(path) => {
            require_path_exists(path, "Missing --config path.")?;
            SyncConfig::load(path)
                .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?
        }
        None => SyncConfig::default(),
    };
    if let Some(choice) = args.window_policy {
        config.window_policy = choice.window_policy();
    }
    let synchronizer = SynchronizerBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build Synchronizer: {err}"))?;

    require_path_exists(&args.dataset_root, "Missing dataset root.")?;
    let include_ids = load_case_filter(args.cases_file.as_ref())?;
    let mut cases = discover_cases(&args.dataset_root)?;
    if let Some(ids) = include_ids.as_ref() {
        cases.retain(|case| ids.contains(&case.id));
    }
    if args.offset > 0 {
        cases = cases.into_iter().skip(args.offset).collect();
    }
    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }
    if cases.is_empty() {
        return Err("No cases selected after applying filters/offset/limit.".to_string());
    }

    let manual_labels = match args.manual_labels.as_ref() {
        Some(path) => Some(
            load_manual_labels(path)
                .map_err(|err| format!("Failed to load manual labels '{}': {err}", path.display()))?,
        ),
        None => None,
    };

    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");

    let started = Instant::now();
    let mut written = 0usize;
    let mut skipped = 0usize;
    for case in &cases {
        progress.set_message(case.id.clone());
        let wrote = process_case(
            case,
            &synchronizer,
            &args.out_dir,
            args.output_format,
            manual_labels.as_deref(),
        )?;
        if wrote {
            written += 1;
        } else {
            skipped += 1;
        }
        progress.inc(1);
    }
    progress.finish_with_message("synchronization pass complete");

    println!(
        "Wrote {written} report(s) to '{}', skipped {skipped} case(s) without events in {}.",
        args.out_dir.display(),
        format_duration_hms(started.elapsed())
    );
    Ok(())
}

/// Returns `false` when the case produced no events and nothing was written.
fn process_case(
    case: &Case,
    synchronizer: &Synchronizer,
    out_dir: &Path,
    output_format: OutputFormat,
    manual_labels: Option<&[ManualLabel]>,
) -> Result<bool, String> {
    let segments = load_segments(&case.segments_path).map_err(|err| {
        format!(
            "{}: failed to load segments '{}': {err}",
            case.id,
            case.segments_path.display()
        )
    })?;
    // A missing face series is partial sensor failure, not a reason to drop the interview.
    let face_series = match load_face_series(&case.faces_path) {
        Ok(series) => series,
        Err(err) => {
            tracing::warn!(
                case = case.id.as_str(),
                path = %case.faces_path.display(),
                error = %err,
                "face series unavailable; continuing with neutral face windows"
            );
            Vec::new()
        }
    };

    let video_path = case
        .video_path
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());
    let mut report = synchronizer
        .analyze(&interview_id_for(&case.id), video_path, &segments, &face_series)
        .map_err(|err| format!("{}: synchronization failed: {err}", case.id))?;
    if report.events.is_empty() {
        tracing::warn!(case = case.id.as_str(), "no events produced; skipping report");
        return Ok(false);
    }
    report.generated_at = Some(Utc::now().to_rfc3339());

    match output_format {
        OutputFormat::Json => {
            let path = out_dir.join(format!("{}_FINAL.json", case.id));
            json_report_formatter::write_json(&path, &report, "report")?;
            tracing::info!(path = %path.display(), "report written");
        }
        OutputFormat::TextGrid => {
            let path = text_grid_report_formatter::write_textgrid(out_dir, &case.id, &report)?;
            tracing::info!(path = %path.display(), "TextGrid written");
        }
    }

    if let Some(labels) = manual_labels {
        let summary = validate_report(&report, labels);
        let path = out_dir.join(format!("{}_validation.json", case.id));
        json_report_formatter::write_json(&path, &summary, "validation")?;
    }
    Ok(true)
}

fn discover_cases(dataset_root: &Path) -> Result<Vec<Case>, String> {
    let mut segment_files = Vec::new();
    collect_segment_files(dataset_root, &mut segment_files)?;
    segment_files.sort();

    let cases = segment_files
        .into_iter()
        .filter_map(|segments_path| {
            let file_name = segments_path.file_name()?.to_str()?;
            let id = file_name.strip_suffix(SEGMENTS_SUFFIX)?.to_string();
            let dir = segments_path.parent()?.to_path_buf();
            let video_path = VIDEO_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{id}.{ext}")))
                .find(|path| path.exists());
            Some(Case {
                faces_path: dir.join(format!("{id}{FACES_SUFFIX}")),
                id,
                segments_path,
                video_path,
            })
        })
        .collect();
    Ok(cases)
}

fn collect_segment_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to read directory '{}': {err}", dir.display()))?;
    for entry in entries {
        let entry = entry.map_err(|err| {
            format!(
                "Failed to read directory entry in '{}': {err}",
                dir.display()
            )
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_segment_files(&path, out)?;
            continue;
        }
        if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(SEGMENTS_SUFFIX))
        {
            out.push(path);
        }
    }
    Ok(())
}

fn load_case_filter(cases_file: Option<&PathBuf>) -> Result<Option<HashSet<String>>, String> {
    let Some(path) = cases_file else {
        return Ok(None);
    };
    require_path_exists(path, "Missing --cases-file path.")?;

    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read cases file '{}': {err}", path.display()))?;
    let ids = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect::<HashSet<_>>();

    if ids.is_empty() {
        return Err(format!(
            "No case IDs were parsed from '{}'.",
            path.display()
        ));
    }
    Ok(Some(ids))
}

fn format_duration_hms(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}
