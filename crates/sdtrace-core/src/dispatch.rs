//! CPU frame dispatch
//!
//! Both paths evaluate the same per-pixel function, so their output is
//! bit-identical. Rows are the unit of work for the parallel path.

use crate::frame::Frame;
use crate::trace::RenderContext;
use crate::Result;
use rayon::prelude::*;
use tracing::debug;

/// Render every pixel on the calling thread
pub fn render_sequential(ctx: &RenderContext<'_>) -> Frame {
    let settings = ctx.settings();
    let mut frame = Frame::new(settings.width, settings.height, settings.background());

    let width = settings.width as usize;
    if width == 0 {
        return frame;
    }
    for (y, row) in frame.pixels_mut().chunks_mut(width).enumerate() {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = ctx.sample_pixel(x as u32, y as u32);
        }
    }
    frame
}

/// Render rows across a rayon pool of `settings.threads` workers
/// (0 = one per core)
pub fn render_parallel(ctx: &RenderContext<'_>) -> Result<Frame> {
    let settings = ctx.settings();
    let mut frame = Frame::new(settings.width, settings.height, settings.background());

    let width = settings.width as usize;
    if width == 0 {
        return Ok(frame);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .build()?;
    debug!(threads = pool.current_num_threads(), "Parallel render");

    pool.install(|| {
        frame
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.iter_mut().enumerate() {
                    *pixel = ctx.sample_pixel(x as u32, y as u32);
                }
            });
    });
    Ok(frame)
}
