//! FFmpeg command builder and runner.
//!
//! Every value reaching ffmpeg is passed as a discrete process argument.
//! Nothing here ever goes through a shell, so clip identifiers and paths
//! from the input table cannot smuggle in extra arguments or commands.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::progress::{is_progress_line, parse_progress_line, FfmpegProgress};

/// How many trailing log lines to keep for error reporting.
const STDERR_TAIL_LINES: usize = 40;

/// Builder for FFmpeg invocations.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Arguments placed before -i (seek lives here so ffmpeg seeks by
    /// demuxing, which is what makes stream copy fast)
    input_args: Vec<String>,
    /// Arguments placed after -i
    output_args: Vec<String>,
    /// Whether to overwrite an existing output
    overwrite: bool,
    /// ffmpeg log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input argument (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add an output argument (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Seek position in the source, applied before the input.
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Length of output to write.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Copy all streams without re-encoding.
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Shift negative timestamps introduced by seeking to a non-keyframe
    /// boundary up to zero.
    pub fn avoid_negative_ts(self) -> Self {
        self.output_arg("-avoid_negative_ts").output_arg("make_zero")
    }

    /// Set ffmpeg's own log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the full argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        // Progress stream interleaved with log output on stderr
        args.push("-progress".to_string());
        args.push("pipe:2".to_string());

        args.extend(self.input_args.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with timeout and cancellation.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    /// Cancellation signal receiver
    cancel_rx: Option<watch::Receiver<bool>>,
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command.
    pub async fn run(&self, cmd: &FfmpegCommand) -> ExtractResult<()> {
        self.run_with_progress(cmd, |_| {}).await
    }

    /// Run an FFmpeg command, invoking `progress_callback` for each progress
    /// block ffmpeg reports.
    pub async fn run_with_progress<F>(
        &self,
        cmd: &FfmpegCommand,
        progress_callback: F,
    ) -> ExtractResult<()>
    where
        F: Fn(FfmpegProgress) + Send + 'static,
    {
        which::which("ffmpeg").map_err(|_| ExtractError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let stderr = child.stderr.take().expect("stderr not captured");
        let mut reader = BufReader::new(stderr).lines();

        // Split stderr into progress blocks (forwarded to the callback) and
        // plain log lines (kept as a tail for error reporting).
        let stderr_handle = tokio::spawn(async move {
            let mut current = FfmpegProgress::default();
            let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);

            while let Ok(Some(line)) = reader.next_line().await {
                if let Some(progress) = parse_progress_line(&line, &mut current) {
                    progress_callback(progress);
                } else if !line.trim().is_empty() && !is_progress_line(&line) {
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }

            tail.into_iter().collect::<Vec<_>>().join("\n")
        });

        let result = self.wait_for_completion(&mut child).await;
        let stderr_tail = stderr_handle.await.unwrap_or_default();

        match result {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(ExtractError::ffmpeg_failed(
                "ffmpeg exited with non-zero status",
                (!stderr_tail.is_empty()).then_some(stderr_tail),
                status.code(),
            )),
            Err(e) => Err(e),
        }
    }

    /// Wait for the child to exit, honoring cancellation and the timeout.
    /// The child is killed on either.
    async fn wait_for_completion(
        &self,
        child: &mut Child,
    ) -> ExtractResult<std::process::ExitStatus> {
        match self.timeout_secs {
            Some(timeout_secs) => {
                let waited = tokio::time::timeout(
                    std::time::Duration::from_secs(timeout_secs),
                    wait_or_cancel(child, self.cancel_rx.clone()),
                )
                .await;
                match waited {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(
                            timeout_secs = timeout_secs,
                            "ffmpeg timed out, killing process"
                        );
                        let _ = child.kill().await;
                        Err(ExtractError::Timeout(timeout_secs))
                    }
                }
            }
            None => wait_or_cancel(child, self.cancel_rx.clone()).await,
        }
    }
}

async fn wait_or_cancel(
    child: &mut Child,
    cancel_rx: Option<watch::Receiver<bool>>,
) -> ExtractResult<std::process::ExitStatus> {
    match cancel_rx {
        Some(mut rx) => {
            tokio::select! {
                status = child.wait() => Ok(status?),
                _ = cancelled(&mut rx) => {
                    info!("ffmpeg cancelled, killing process");
                    let _ = child.kill().await;
                    Err(ExtractError::Cancelled)
                }
            }
        }
        None => Ok(child.wait().await?),
    }
}

/// Resolve once the cancellation flag flips to true. Pends forever if the
/// sender is dropped without cancelling.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if *rx.borrow() {
        return;
    }
    while rx.changed().await.is_ok() {
        if *rx.borrow() {
            return;
        }
    }
    std::future::pending::<()>().await
}

/// Check that ffmpeg is reachable on PATH.
pub fn check_ffmpeg() -> ExtractResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| ExtractError::FfmpegNotFound)
}
