use crate::captions::model::{Caption, CaptionId};
use crate::captions::store::CaptionStore;
use crate::foundation::error::{RelingoError, RelingoResult};

/// Render captions as SubRip text: 1-based sequence numbers in store order, `HH:MM:SS,mmm`
/// timestamps, blocks separated by one blank line.
pub fn export_srt(store: &CaptionStore) -> String {
    let mut out = String::new();
    for (i, c) in store.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n",
            i + 1,
            format_srt_time(c.start),
            format_srt_time(c.end),
            c.text
        ));
    }
    out
}

/// Format seconds as `HH:MM:SS,mmm`, rounding to the nearest millisecond.
pub fn format_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let s = total_secs % 60;
    let total_mins = total_secs / 60;
    let m = total_mins % 60;
    let h = total_mins / 60;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Parse `HH:MM:SS,mmm` (a `.` separator is accepted too) into seconds.
pub fn parse_srt_time(s: &str) -> RelingoResult<f64> {
    let bad = || RelingoError::validation(format!("invalid srt timestamp '{s}'"));
    let s = s.trim();
    let (hms, ms) = s.split_once([',', '.']).ok_or_else(bad)?;
    let mut parts = hms.split(':');
    let h: u64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let m: u64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let sec: u64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    if parts.next().is_some() || m >= 60 || sec >= 60 || ms.len() != 3 {
        return Err(bad());
    }
    let ms: u64 = ms.parse().map_err(|_| bad())?;
    let total_ms = h
        .checked_mul(3600)
        .and_then(|secs| secs.checked_add(m * 60 + sec))
        .and_then(|secs| secs.checked_mul(1000))
        .and_then(|total| total.checked_add(ms))
        .ok_or_else(bad)?;
    Ok(total_ms as f64 / 1000.0)
}

/// Parse SubRip text into a store. Caption ids are the block sequence numbers.
pub fn parse_srt(text: &str) -> RelingoResult<CaptionStore> {
    let normalized = text.replace("\r\n", "\n");
    let normalized = normalized.trim_start_matches('\u{feff}');
    let mut captions = Vec::new();

    for block in normalized.split("\n\n") {
        let mut lines = block.lines().filter(|l| !l.trim().is_empty());
        let Some(first) = lines.next() else {
            continue;
        };

        // The sequence line is optional in the wild; fall back to a positional id.
        let (id, timing) = if first.contains("-->") {
            (CaptionId::from((captions.len() + 1).to_string()), first)
        } else {
            let timing = lines.next().ok_or_else(|| {
                RelingoError::validation(format!("srt block '{}' has no timing line", first.trim()))
            })?;
            (CaptionId::from(first.trim()), timing)
        };

        let (start, end) = timing.split_once("-->").ok_or_else(|| {
            RelingoError::validation(format!("invalid srt timing line '{}'", timing.trim()))
        })?;
        // Drop trailing cue settings such as `X1:...` after the end stamp.
        let end = end.split_whitespace().next().unwrap_or_default();
        let text = lines.map(str::trim_end).collect::<Vec<_>>().join("\n");

        captions.push(Caption::new(
            id,
            parse_srt_time(start)?,
            parse_srt_time(end)?,
            text,
        )?);
    }

    CaptionStore::from_captions(captions)
}

#[cfg(test)]
#[path = "../../tests/unit/captions/srt.rs"]
mod tests;
