use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::duration::format_duration;

const MIN_FRAME_TIME: Duration = Duration::from_millis(1);

/// Timed steps reported on the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Link,
    DrawAndRead,
    Copy,
    Save,
}

impl Stage {
    fn label(self) -> &'static str {
        match self {
            Stage::Compile => "Compiling shaders... ",
            Stage::Link => "Linking program... ",
            Stage::DrawAndRead => "  Drawing and reading pixels... ",
            Stage::Copy => "  Copying image data... ",
            Stage::Save => "  Saving... ",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Compile => "compile",
            Stage::Link => "link",
            Stage::DrawAndRead => "draw+readback",
            Stage::Copy => "copy",
            Stage::Save => "encode+save",
        }
    }
}

/// A stage whose label has been printed and whose clock is running.
#[must_use]
pub struct StageTimer {
    stage: Stage,
    started: Instant,
}

/// Line-oriented progress and timing text.
///
/// Stage labels are flushed before the work starts so a slow stage shows what
/// it is waiting on; the elapsed milliseconds complete the line afterwards.
pub struct ProgressReporter<W> {
    out: W,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn start(&mut self, stage: Stage) -> io::Result<StageTimer> {
        self.out.write_all(stage.label().as_bytes())?;
        self.out.flush()?;
        Ok(StageTimer {
            stage,
            started: Instant::now(),
        })
    }

    pub fn finish(&mut self, timer: StageTimer) -> io::Result<Duration> {
        let elapsed = timer.started.elapsed();
        writeln!(self.out, "{}ms", elapsed.as_millis())?;
        tracing::debug!(
            stage = timer.stage.name(),
            elapsed_ms = elapsed.as_secs_f64() * 1_000.0,
            "stage finished"
        );
        Ok(elapsed)
    }

    pub fn frame(&mut self, index: u32, total: u32) -> io::Result<()> {
        writeln!(self.out, "Frame {index}/{total}")
    }

    pub fn summary(&mut self, elapsed: Duration, frames: u32) -> io::Result<()> {
        writeln!(self.out, "{}", summary_line(elapsed, frames))
    }
}

/// `Finished in …` line with either frames per second or time per frame.
pub fn summary_line(elapsed: Duration, frames: u32) -> String {
    let total = format_duration(elapsed);
    let per_frame = elapsed / frames.max(1);
    if per_frame < Duration::from_secs(1) {
        // Timings are reported in whole milliseconds; a frame never counts as faster.
        let fps = 1.0 / per_frame.max(MIN_FRAME_TIME).as_secs_f64();
        format!("Finished in {total} with an average of {fps:.3}fps")
    } else {
        format!(
            "Finished in {total} with an average of {}pf",
            format_duration(per_frame)
        )
    }
}
