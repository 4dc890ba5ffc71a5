use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{
    composition::model::VideoConfig,
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{TweenreelError, TweenreelResult},
    render::snapshot::FrameSnapshot,
};

/// Configuration provided to a [`FrameSink`] at the start of a range render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SinkConfig {
    pub composition: String,
    pub video: VideoConfig,
    pub range: FrameRange,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order within the
/// requested render range.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> TweenreelResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameSnapshot) -> TweenreelResult<()>;
    fn end(&mut self) -> TweenreelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in timeline order.
    pub frames: Vec<FrameSnapshot>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TweenreelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameSnapshot) -> TweenreelResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> TweenreelResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes one JSON document per line: the [`SinkConfig`] header, then one [`FrameSnapshot`] per
/// frame.
pub struct JsonLinesSink<W: Write> {
    out: W,
    next: Option<FrameIndex>,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create (or truncate) `path`, creating missing parent directories.
    pub fn create(path: impl AsRef<Path>) -> TweenreelResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                TweenreelError::validation(format!(
                    "create output dir '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        let f = File::create(path).map_err(|e| {
            TweenreelError::validation(format!("create '{}': {e}", path.display()))
        })?;
        Ok(Self::new(BufWriter::new(f)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, next: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: serde::Serialize>(&mut self, value: &T) -> TweenreelResult<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out
            .write_all(b"\n")
            .map_err(|e| TweenreelError::Other(e.into()))
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> TweenreelResult<()> {
        self.next = Some(cfg.range.start);
        self.write_line(&cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameSnapshot) -> TweenreelResult<()> {
        if self.next != Some(idx) {
            return Err(TweenreelError::evaluation(format!(
                "json-lines sink expected frame {:?}, got {}",
                self.next.map(|f| f.0),
                idx.0
            )));
        }
        self.next = Some(FrameIndex(idx.0 + 1));
        self.write_line(frame)
    }

    fn end(&mut self) -> TweenreelResult<()> {
        self.out
            .flush()
            .map_err(|e| TweenreelError::Other(e.into()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
