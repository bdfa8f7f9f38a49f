//! Encoding frame sequences into GIF and MP4 artifacts.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::time::Instant;

use cinema_common::error::{CinemaError, CinemaResult};
use cinema_common::process::{require_tool, Invocation};
use cinema_model::frame::FRAME_PREFIX;

use crate::magick::Magick;

/// An encode job: numbered frames in order, shown for `frame_seconds` each.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub frames: Vec<PathBuf>,
    pub output: PathBuf,
    pub frame_seconds: f64,
    /// Output frame rate (MP4 only).
    pub fps: u32,
}

/// Progress callback for encoding.
pub type ProgressCallback = Box<dyn Fn(ExportProgress)>;

/// Encoding progress report.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,
    pub frames_encoded: u64,
    pub total_frames: u64,
    /// Estimated time remaining in seconds.
    pub eta_secs: f64,
    pub stage: ExportStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Encoding,
    Finalizing,
    Complete,
}

/// Trait for encode backends.
pub trait EncodeBackend {
    fn encode(&self, job: &EncodeJob, progress: Option<ProgressCallback>) -> CinemaResult<()>;
}

impl EncodeJob {
    /// Total playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames.len() as f64 * self.frame_seconds
    }

    fn ensure_frames(&self) -> CinemaResult<()> {
        if self.frames.is_empty() {
            Err(CinemaError::encode(format!(
                "No frames to encode into {}",
                self.output.display()
            )))
        } else {
            Ok(())
        }
    }
}

/// GIF delay in centiseconds for a per-frame duration, at least 1.
pub fn gif_delay(frame_seconds: f64) -> u32 {
    ((frame_seconds * 100.0).round() as u32).max(1)
}

/// ffmpeg `-framerate` for still frames shown `frame_seconds` each:
/// `1/N` for whole seconds, otherwise the reciprocal to six decimals.
pub fn input_rate(frame_seconds: f64) -> String {
    if frame_seconds.fract() == 0.0 && frame_seconds >= 1.0 {
        format!("1/{}", frame_seconds as u64)
    } else {
        format!("{:.6}", 1.0 / frame_seconds)
    }
}

/// Looping GIF through ImageMagick.
pub struct GifEncoder<'a> {
    magick: &'a Magick,
}

impl<'a> GifEncoder<'a> {
    pub fn new(magick: &'a Magick) -> Self {
        Self { magick }
    }
}

impl EncodeBackend for GifEncoder<'_> {
    fn encode(&self, job: &EncodeJob, progress: Option<ProgressCallback>) -> CinemaResult<()> {
        job.ensure_frames()?;
        let delay = gif_delay(job.frame_seconds);
        tracing::info!(
            frames = job.frames.len(),
            delay_cs = delay,
            output = %job.output.display(),
            "Assembling GIF"
        );
        self.magick.assemble_gif(&job.frames, delay, &job.output)?;

        if let Some(cb) = &progress {
            let total = job.frames.len() as u64;
            cb(ExportProgress {
                progress: 1.0,
                frames_encoded: total,
                total_frames: total,
                eta_secs: 0.0,
                stage: ExportStage::Complete,
            });
        }
        Ok(())
    }
}

/// H.264 MP4 through ffmpeg.
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn detect(binary: &str) -> CinemaResult<Self> {
        require_tool(binary, "Install ffmpeg.").map(Self::new)
    }

    fn run_ffmpeg(&self, job: &EncodeJob, progress: Option<ProgressCallback>) -> CinemaResult<()> {
        let args = mp4_args(job)?;
        let expected_duration_secs = job.duration_secs();
        let total_frames = (expected_duration_secs * job.fps as f64).round() as u64;
        tracing::debug!(args = ?args, "Running ffmpeg");

        let invocation = Invocation::new(&self.program).args(&args);
        let program = invocation.program_name();
        let mut cmd = invocation.command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| CinemaError::Spawn {
            program: program.clone(),
            source,
        })?;

        tracing::info!(
            pid = child.id(),
            total_frames,
            output = %job.output.display(),
            "ffmpeg process started"
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CinemaError::encode("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CinemaError::encode("Failed to capture ffmpeg stderr"))?;

        // ffmpeg blocks once its stderr pipe fills; drain it on the side.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let pumped = read_progress(
            BufReader::new(stdout),
            total_frames,
            expected_duration_secs,
            start,
            |report| {
                if let Some(cb) = &progress {
                    cb(report);
                }
            },
        );
        if let Err(err) = pumped {
            stop_child(&mut child);
            let _ = stderr_task.join();
            return Err(err);
        }

        let status = child
            .wait()
            .map_err(|e| CinemaError::encode(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            return Err(CinemaError::Tool {
                program,
                status: status.to_string(),
                stderr: stderr_output.trim().to_string(),
            });
        }

        if let Some(cb) = &progress {
            cb(ExportProgress {
                progress: 1.0,
                frames_encoded: total_frames,
                total_frames,
                eta_secs: 0.0,
                stage: ExportStage::Complete,
            });
        }
        Ok(())
    }
}

impl EncodeBackend for FfmpegEncoder {
    fn encode(&self, job: &EncodeJob, progress: Option<ProgressCallback>) -> CinemaResult<()> {
        job.ensure_frames()?;
        self.run_ffmpeg(job, progress)
    }
}

/// Forward every `progress=` block ffmpeg writes to `on_report` until EOF.
fn read_progress<R: BufRead>(
    mut reader: R,
    total_frames: u64,
    expected_duration_secs: f64,
    start: Instant,
    mut on_report: impl FnMut(ExportProgress),
) -> CinemaResult<()> {
    let mut line = String::new();
    let mut latest = ProgressState::default();
    loop {
        line.clear();
        let bytes = reader
            .read_line(&mut line)
            .map_err(|e| CinemaError::encode(format!("Failed reading ffmpeg progress: {e}")))?;
        if bytes == 0 {
            return Ok(());
        }

        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        latest.update(key, value);
        if key == "progress" {
            let report = progress_report(
                &latest,
                total_frames,
                expected_duration_secs,
                start.elapsed().as_secs_f64(),
            );
            tracing::trace!(
                progress = report.progress,
                eta_secs = report.eta_secs,
                "ffmpeg progress"
            );
            on_report(report);
        }
    }
}

/// Kill and reap a child we are abandoning.
fn stop_child(child: &mut Child) {
    if let Err(err) = child.kill() {
        tracing::debug!(error = %err, "ffmpeg already exited");
    }
    if let Err(err) = child.wait() {
        tracing::warn!(error = %err, "Failed to reap ffmpeg");
    }
}

/// Directory holding the job's numbered frames.
fn frames_dir(job: &EncodeJob) -> CinemaResult<&Path> {
    job.frames
        .first()
        .and_then(|p| p.parent())
        .ok_or_else(|| CinemaError::encode("Frame paths have no parent directory"))
}

/// ffmpeg arguments. Frames are read through the `frame_%04d.png` pattern,
/// so they must be numbered contiguously from 1.
pub fn mp4_args(job: &EncodeJob) -> CinemaResult<Vec<OsString>> {
    let pattern = frames_dir(job)?.join(format!("{FRAME_PREFIX}%04d.png"));
    let fps = job.fps.max(1);
    let filter = format!("fps={fps},pad=ceil(iw/2)*2:ceil(ih/2)*2");

    let mut args: Vec<OsString> = [
        "-y",
        "-hide_banner",
        "-loglevel",
        "error",
        "-nostats",
        "-progress",
        "pipe:1",
        "-framerate",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(input_rate(job.frame_seconds).into());
    args.push("-start_number".into());
    args.push("1".into());
    args.push("-i".into());
    args.push(pattern.into_os_string());
    for arg in ["-vf", filter.as_str(), "-r"] {
        args.push(arg.into());
    }
    args.push(fps.to_string().into());
    for arg in ["-pix_fmt", "yuv420p"] {
        args.push(arg.into());
    }
    args.push(job.output.clone().into_os_string());
    Ok(args)
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            // ffmpeg reports microseconds under both names.
            "out_time_ms" | "out_time_us" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }
}

fn progress_report(
    state: &ProgressState,
    total_frames: u64,
    expected_duration_secs: f64,
    elapsed_secs: f64,
) -> ExportProgress {
    let progress = if expected_duration_secs <= 0.0 {
        0.0
    } else {
        (state.out_time_secs / expected_duration_secs).clamp(0.0, 1.0)
    };

    let frames_encoded = (progress * total_frames as f64).round() as u64;
    let eta_secs = if progress > 0.0 {
        (elapsed_secs / progress) - elapsed_secs
    } else {
        0.0
    }
    .max(0.0);

    ExportProgress {
        progress: if state.complete { 1.0 } else { progress },
        frames_encoded,
        total_frames,
        eta_secs,
        stage: if state.complete {
            ExportStage::Finalizing
        } else {
            ExportStage::Encoding
        },
    }
}
