//! Parsing for ffmpeg's `-progress pipe:2` output stream.

/// Progress snapshot emitted while ffmpeg is running.
#[derive(Debug, Clone, Default)]
pub struct FfmpegProgress {
    /// Output position in milliseconds.
    pub out_time_ms: i64,
    /// Output position as HH:MM:SS.microseconds.
    pub out_time: String,
    /// Processing speed relative to realtime.
    pub speed: f64,
    /// True once ffmpeg reported `progress=end`.
    pub is_complete: bool,
}

/// Feed one stderr line into the running progress state.
///
/// Returns a snapshot when a `progress=` marker closes an update block,
/// `None` otherwise.
pub fn parse_progress_line(line: &str, current: &mut FfmpegProgress) -> Option<FfmpegProgress> {
    let line = line.trim();

    if let Some((key, value)) = line.split_once('=') {
        match key {
            "out_time_ms" | "out_time_us" => {
                // Both keys carry microseconds in modern ffmpeg; out_time_ms
                // is a historical misnomer upstream.
                if let Ok(us) = value.parse::<i64>() {
                    current.out_time_ms = us / 1000;
                }
            }
            "out_time" => {
                current.out_time = value.to_string();
            }
            "speed" => {
                if value != "N/A" {
                    if let Some(speed_str) = value.strip_suffix('x') {
                        if let Ok(speed) = speed_str.parse() {
                            current.speed = speed;
                        }
                    }
                }
            }
            "progress" => {
                if value == "end" {
                    current.is_complete = true;
                }
                return Some(current.clone());
            }
            _ => {}
        }
    }

    None
}

fn is_progress_key(key: &str) -> bool {
    matches!(
        key,
        "frame"
            | "fps"
            | "bitrate"
            | "total_size"
            | "out_time_us"
            | "out_time_ms"
            | "out_time"
            | "dup_frames"
            | "drop_frames"
            | "speed"
            | "progress"
    ) || (key.starts_with("stream_") && key.ends_with("_q"))
}

/// True for lines belonging to the `-progress` key=value stream.
///
/// Diagnostic output can also contain `=` (for example
/// `Packet corrupt (stream = 0, dts = 123)`), so membership is decided by
/// the key, not by the presence of the separator.
pub fn is_progress_line(line: &str) -> bool {
    match line.trim().split_once('=') {
        Some((key, _)) => is_progress_key(key),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_parsing() {
        let mut progress = FfmpegProgress::default();

        assert!(parse_progress_line("out_time_ms=5000000", &mut progress).is_none());
        assert_eq!(progress.out_time_ms, 5000);

        parse_progress_line("out_time=00:00:05.000000", &mut progress);
        assert_eq!(progress.out_time, "00:00:05.000000");

        parse_progress_line("speed=1.5x", &mut progress);
        assert!((progress.speed - 1.5).abs() < 0.01);

        let snapshot = parse_progress_line("progress=continue", &mut progress);
        assert!(snapshot.is_some());
        assert!(!progress.is_complete);

        let snapshot = parse_progress_line("progress=end", &mut progress);
        assert!(snapshot.is_some());
        assert!(progress.is_complete);
    }

    #[test]
    fn test_non_progress_lines_ignored() {
        let mut progress = FfmpegProgress::default();
        assert!(parse_progress_line("frame=  120 fps= 60", &mut progress).is_none());
        assert!(parse_progress_line("speed=N/A", &mut progress).is_none());
        assert!(parse_progress_line("", &mut progress).is_none());
    }

    #[test]
    fn test_progress_line_detection() {
        assert!(is_progress_line("frame=42"));
        assert!(is_progress_line("out_time_ms=5000000"));
        assert!(is_progress_line("stream_0_0_q=28.0"));
        assert!(is_progress_line("progress=end"));
        assert!(is_progress_line("  speed=1.5x  "));

        // Diagnostic lines that happen to contain '=' are not progress.
        assert!(!is_progress_line("Packet corrupt (stream = 0, dts = 123456)"));
        assert!(!is_progress_line(
            "[mp4 @ 0x55] moov atom not found, pos=1024"
        ));
        assert!(!is_progress_line("plain error text"));
        assert!(!is_progress_line(""));
    }
}
