use rayon::prelude::*;

use crate::{
    composition::model::{CompositionDef, VideoConfig},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{TweenreelError, TweenreelResult},
    render::instance::Instance,
    render::snapshot::FrameSnapshot,
};

/// Options controlling `RenderSession` range rendering behavior.
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Render frames of a chunk in parallel on a dedicated rayon pool.
    pub parallel: bool,
    /// Frames rendered per chunk before they are handed to the sink.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    /// Frames whose fingerprint equals the previous frame's.
    pub frames_static: u64,
}

/// Renders frames of one composition.
///
/// Single frames go through one long-lived [`Instance`]. In parallel range renders every rayon
/// worker builds its own instance; bridges are never shared across threads. Because a snapshot
/// depends only on its frame, both paths produce identical output.
pub struct RenderSession {
    def: CompositionDef,
    instance: Instance,
    opts: RenderSessionOpts,
}

impl RenderSession {
    #[tracing::instrument(skip(def, opts), fields(id = %def.id))]
    pub fn new(def: &CompositionDef, opts: RenderSessionOpts) -> TweenreelResult<Self> {
        def.validate()?;
        Ok(Self {
            def: def.clone(),
            instance: Instance::from_validated(def),
            opts,
        })
    }

    pub fn video_config(&self) -> VideoConfig {
        self.def.video_config()
    }

    /// Full frame range of the composition.
    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.def.duration_in_frames),
        }
    }

    pub fn render_frame(&mut self, frame: FrameIndex) -> TweenreelResult<FrameSnapshot> {
        self.instance.render_frame(frame)
    }

    /// Render a frame range and stream snapshots into a sink.
    ///
    /// The sink receives frames in strictly increasing frame index order, whatever order the
    /// workers finish in.
    #[tracing::instrument(skip(self, sink), fields(id = %self.def.id, start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> TweenreelResult<RenderStats> {
        if range.is_empty() {
            return Err(TweenreelError::validation(
                "render_range range must be non-empty",
            ));
        }
        if range.end.0 > self.def.duration_in_frames {
            return Err(TweenreelError::validation(
                "render_range range must be within composition duration",
            ));
        }

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };
        let chunk_size = normalized_chunk_size(self.opts.chunk_size).min(range.len_frames());

        sink.begin(SinkConfig {
            composition: self.def.id.clone(),
            video: self.def.video_config(),
            range,
        })?;

        let mut stats = RenderStats::default();
        let mut last_fingerprint = None;
        let mut chunk_start = range.start.0;
        while chunk_start < range.end.0 {
            let chunk_end = (chunk_start + chunk_size).min(range.end.0);
            let frames = match &pool {
                Some(pool) => render_chunk_parallel(&self.def, pool, chunk_start, chunk_end)?,
                None => (chunk_start..chunk_end)
                    .map(|f| self.instance.render_frame(FrameIndex(f)))
                    .collect::<TweenreelResult<Vec<_>>>()?,
            };
            for snap in &frames {
                let fp = snap.fingerprint();
                if last_fingerprint == Some(fp) {
                    stats.frames_static += 1;
                }
                last_fingerprint = Some(fp);
                sink.push_frame(snap.frame, snap)?;
            }
            stats.frames_total += chunk_end - chunk_start;
            tracing::debug!(chunk_start, chunk_end, "chunk rendered");
            chunk_start = chunk_end;
        }

        sink.end()?;
        Ok(stats)
    }
}

/// Indexed collect keeps frame order; each rayon split mounts its own instance.
fn render_chunk_parallel(
    def: &CompositionDef,
    pool: &rayon::ThreadPool,
    chunk_start: u64,
    chunk_end: u64,
) -> TweenreelResult<Vec<FrameSnapshot>> {
    let len = usize::try_from(chunk_end - chunk_start)
        .map_err(|_| TweenreelError::validation("chunk does not fit in memory"))?;
    pool.install(|| {
        (0..len)
            .into_par_iter()
            .map_init(
                || Instance::from_validated(def),
                |inst, i| inst.render_frame(FrameIndex(chunk_start + i as u64)),
            )
            .collect::<TweenreelResult<Vec<_>>>()
    })
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

fn build_thread_pool(threads: Option<usize>) -> TweenreelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TweenreelError::validation(
            "render_range 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| TweenreelError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
