// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A channel renderer owns one raster and paints one normal component
//! of a field into it.
//!
//! Only interior pixels are painted: pixel `(x, y)` needs the field at
//! `x + 1` and `y + 1`, and the last column and row are left at the
//! fill color rather than sampled outside the domain rectangle.
//!
//! A pixel whose normal cannot be estimated keeps its previous color
//! and is logged.  The minors are built as fixed 3x3 arrays, so in
//! practice every interior pixel is painted.

use itertools::iproduct;
use log::{debug, warn};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::color::{Color, Gradient};
use crate::error::Error;
use crate::field::ScalarField;
use crate::normal::{estimate, NormalComponent};
use crate::planes::{DomainRect, Pixel, PlaneMapper};
use crate::raster::RasterBuffer;

/// Whether a channel has been painted yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderState {
    /// Freshly created; every pixel holds the fill color.
    Uninitialized,
    /// At least one render pass has completed.
    Rendered,
}

/// Everything a worker needs to color a pixel.  Copied out of the
/// renderer so that the raster can be borrowed mutably alongside it.
struct Painter<'a, F: ?Sized> {
    field: &'a F,
    mapper: PlaneMapper,
    gradient: Gradient,
    component: NormalComponent,
}

impl<'a, F: ScalarField + ?Sized> Painter<'a, F> {
    fn shade(&self, pixel: Pixel) -> Option<Color> {
        match estimate(self.field, &self.mapper, pixel) {
            Ok(normal) => Some(self.gradient.for_normal(normal.component(self.component))),
            Err(e) => {
                warn!("skipping pixel ({}, {}): {}", pixel.0, pixel.1, e);
                None
            }
        }
    }

    fn paint_row(&self, y: usize, row: &mut [Color]) {
        let interior = row.len() - 1;
        for (x, cell) in row.iter_mut().enumerate().take(interior) {
            if let Some(color) = self.shade(Pixel(x, y)) {
                *cell = color;
            }
        }
    }
}

/// One pane of the visualization: a raster, the normal component it
/// shows, and the gradient it is colored with.
#[derive(Clone, Debug)]
pub struct ChannelRenderer {
    buffer: RasterBuffer,
    component: NormalComponent,
    gradient: Gradient,
    state: RenderState,
}

impl ChannelRenderer {
    /// Allocates a `width` x `height` raster filled with cyan, using
    /// the default black-to-white gradient.
    pub fn new(width: usize, height: usize, component: NormalComponent) -> Result<Self, Error> {
        Ok(ChannelRenderer {
            buffer: RasterBuffer::new(width, height, Color::CYAN)?,
            component,
            gradient: Gradient::default(),
            state: RenderState::Uninitialized,
        })
    }

    /// As `new`, selecting the component by channel index.
    pub fn with_index(width: usize, height: usize, index: i32) -> Result<Self, Error> {
        ChannelRenderer::new(width, height, NormalComponent::from_index(index))
    }

    /// The raster, as of the last completed operation.
    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    /// The component this channel shows.
    pub fn component(&self) -> NormalComponent {
        self.component
    }

    /// The gradient pixels are currently colored with.
    pub fn gradient(&self) -> Gradient {
        self.gradient
    }

    /// Whether a render has completed.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Replaces the gradient without touching any pixel; the next
    /// render uses it.
    pub fn set_gradient(&mut self, gradient: Gradient) {
        self.gradient = gradient;
    }

    fn painter<'a, F: ScalarField + ?Sized>(
        &self,
        field: &'a F,
        rect: DomainRect,
    ) -> Result<Painter<'a, F>, Error> {
        Ok(Painter {
            field,
            mapper: PlaneMapper::new(self.buffer.width(), self.buffer.height(), rect)?,
            gradient: self.gradient,
            component: self.component,
        })
    }

    /// Paints every interior pixel on the calling thread.
    pub fn render_single<F: ScalarField + ?Sized>(
        &mut self,
        field: &F,
        rect: DomainRect,
    ) -> Result<(), Error> {
        let painter = self.painter(field, rect)?;
        let (width, height) = (self.buffer.width(), self.buffer.height());
        for (x, y) in iproduct!(0..width - 1, 0..height - 1) {
            if let Some(color) = painter.shade(Pixel(x, y)) {
                self.buffer.set(x, y, color);
            }
        }
        self.state = RenderState::Rendered;
        debug!("rendered {} channel on one thread", self.component.name());
        Ok(())
    }

    /// Paints every interior pixel using `threads` workers.  Workers
    /// pull whole rows from a shared queue, so no two of them ever
    /// touch the same pixel.  The result is identical to
    /// `render_single`.
    pub fn render<F: ScalarField + ?Sized>(
        &mut self,
        field: &F,
        rect: DomainRect,
        threads: usize,
    ) -> Result<(), Error> {
        if threads <= 1 {
            return self.render_single(field, rect);
        }

        let painter = self.painter(field, rect)?;
        let height = self.buffer.height();
        let rows = Arc::new(Mutex::new(
            self.buffer.rows_mut().enumerate().take(height - 1),
        ));

        crossbeam::scope(|spawner| {
            for worker in 0..threads {
                let rows = rows.clone();
                let painter = &painter;
                spawner.spawn(move |_| {
                    let mut painted = 0;
                    loop {
                        let row = match rows.lock() {
                            Ok(mut queue) => queue.next(),
                            Err(_) => None,
                        };
                        match row {
                            Some((y, row)) => {
                                painter.paint_row(y, row);
                                painted += 1;
                            }
                            None => {
                                break;
                            }
                        }
                    }
                    debug!("worker {} painted {} rows", worker, painted);
                });
            }
        })
        .map_err(|_| Error::WorkerPanicked)?;

        self.state = RenderState::Rendered;
        debug!(
            "rendered {} channel on {} threads",
            self.component.name(),
            threads
        );
        Ok(())
    }

    /// Recolors the already painted pixels for a new gradient without
    /// evaluating the field again.
    ///
    /// Each pixel's gradient parameter is recovered from its red
    /// channel alone, so the result only approximates a full render:
    /// quantization in the old palette carries over, and the other
    /// channels are ignored.  Prefer `render` when exact pixels matter.
    ///
    /// Fails with `DegenerateGradient`, leaving the raster untouched, if
    /// the current gradient's endpoints share a red value.  A channel
    /// that was never rendered just takes the new gradient.
    pub fn repalette_in_place(&mut self, gradient: Gradient) -> Result<(), Error> {
        if self.state == RenderState::Uninitialized {
            self.gradient = gradient;
            return Ok(());
        }

        let old = self.gradient;
        if old.first.r == old.second.r {
            return Err(Error::DegenerateGradient);
        }

        let (width, height) = (self.buffer.width(), self.buffer.height());
        for row in self.buffer.rows_mut().take(height - 1) {
            for cell in row.iter_mut().take(width - 1) {
                if let Some(t) = old.recover_t(*cell) {
                    *cell = gradient.at(t);
                }
            }
        }
        self.gradient = gradient;
        debug!("repaletted {} channel in place", self.component.name());
        Ok(())
    }

    /// Writes the raster to `path`; see `RasterBuffer::save`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        self.buffer.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::builtin;
    use crate::planes::DomainPoint;
    use std::collections::HashSet;

    fn rect(left: f64, top: f64, width: f64, height: f64) -> DomainRect {
        DomainRect::new(left, top, width, height).unwrap()
    }

    fn interior(r: &RasterBuffer) -> Vec<Color> {
        iproduct!(0..r.height() - 1, 0..r.width() - 1)
            .map(|(y, x)| r.get(x, y).unwrap())
            .collect()
    }

    fn boundary_is_fill(r: &RasterBuffer) -> bool {
        let (w, h) = (r.width(), r.height());
        (0..w).all(|x| r.get(x, h - 1) == Some(r.fill()))
            && (0..h).all(|y| r.get(w - 1, y) == Some(r.fill()))
    }

    fn bowl(p: DomainPoint) -> f64 {
        p.x * p.x + p.y * p.y
    }

    #[test]
    fn starts_uninitialized_and_cyan() {
        let c = ChannelRenderer::with_index(5, 4, 9).unwrap();
        assert_eq!(c.state(), RenderState::Uninitialized);
        assert_eq!(c.component(), NormalComponent::X);
        assert_eq!(c.gradient(), Gradient::default());
        assert!(c.buffer().pixels().iter().all(|&p| p == Color::CYAN));
    }

    #[test]
    fn constant_field_paints_a_single_color() {
        // Field = 5 over a 4x4 rectangle on a 4x4 raster: nx = 0, so
        // t = 0.5 and black-to-white truncates to 127.
        let field = |_: DomainPoint| 5.0;
        let mut c = ChannelRenderer::with_index(4, 4, 0).unwrap();
        c.render_single(&field, rect(0.0, 0.0, 4.0, 4.0)).unwrap();
        assert_eq!(c.state(), RenderState::Rendered);
        let px = interior(c.buffer());
        assert_eq!(px.len(), 9);
        assert!(px.iter().all(|&p| p == Color::rgba(127, 127, 127, 255)));
        assert!(boundary_is_fill(c.buffer()));

        // nw = 5 / sqrt(26), so t = 0.990... and 255 * t = 252.5...
        let mut w = ChannelRenderer::new(4, 4, NormalComponent::W).unwrap();
        w.render_single(&field, rect(0.0, 0.0, 4.0, 4.0)).unwrap();
        assert!(interior(w.buffer())
            .iter()
            .all(|&p| p == Color::rgba(252, 252, 252, 255)));
    }

    #[test]
    fn boundary_keeps_fill_color() {
        let field = builtin("complex").unwrap();
        for &(w, h) in &[(2, 2), (3, 5), (7, 2), (16, 9)] {
            for &threads in &[1, 3] {
                for c in &NormalComponent::ALL {
                    let mut ch = ChannelRenderer::new(w, h, *c).unwrap();
                    ch.render(&field, rect(-10.0, -10.0, 20.0, 20.0), threads)
                        .unwrap();
                    assert!(boundary_is_fill(ch.buffer()), "{}x{} {:?}", w, h, c);
                }
            }
        }
    }

    #[test]
    fn single_row_or_column_paints_nothing() {
        let field = builtin("waves").unwrap();
        let mut ch = ChannelRenderer::new(1, 6, NormalComponent::Y).unwrap();
        ch.render(&field, rect(0.0, 0.0, 1.0, 1.0), 4).unwrap();
        assert!(ch.buffer().pixels().iter().all(|&p| p == Color::CYAN));
    }

    #[test]
    fn threaded_matches_single() {
        let field = builtin("complex").unwrap();
        let area = rect(-10.0, -10.0, 20.0, 20.0);
        for c in &NormalComponent::ALL {
            let mut one = ChannelRenderer::new(37, 23, *c).unwrap();
            let mut many = ChannelRenderer::new(37, 23, *c).unwrap();
            one.render_single(&field, area).unwrap();
            many.render(&field, area, 4).unwrap();
            assert_eq!(one.buffer(), many.buffer());
        }
    }

    #[test]
    fn rendering_is_repeatable() {
        let area = rect(-3.0, -2.0, 6.0, 5.0);
        let mut a = ChannelRenderer::new(20, 20, NormalComponent::Z).unwrap();
        let mut b = ChannelRenderer::new(20, 20, NormalComponent::Z).unwrap();
        a.render(&bowl, area, 3).unwrap();
        b.render(&bowl, area, 3).unwrap();
        assert_eq!(a.buffer(), b.buffer());

        let first = a.buffer().clone();
        a.render(&bowl, area, 2).unwrap();
        assert_eq!(a.buffer(), &first);
    }

    #[test]
    fn non_finite_field_lands_on_first_color() {
        let field = |_: DomainPoint| std::f64::NAN;
        let mut ch = ChannelRenderer::new(5, 5, NormalComponent::X).unwrap();
        ch.set_gradient(Gradient::new(Color::rgb(9, 8, 7), Color::WHITE));
        ch.render(&field, rect(0.0, 0.0, 1.0, 1.0), 2).unwrap();
        assert!(interior(ch.buffer())
            .iter()
            .all(|&p| p == Color::rgb(9, 8, 7)));
    }

    #[test]
    fn bad_rect_is_rejected() {
        let mut ch = ChannelRenderer::new(5, 5, NormalComponent::X).unwrap();
        let bad = DomainRect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 1.0,
        };
        assert!(ch.render(&bowl, bad, 2).is_err());
        assert_eq!(ch.state(), RenderState::Uninitialized);
    }

    #[test]
    fn repalette_before_render_only_records_gradient() {
        let mut ch = ChannelRenderer::new(4, 4, NormalComponent::X).unwrap();
        let g = Gradient::new(Color::rgb(1, 2, 3), Color::rgb(4, 5, 6));
        ch.repalette_in_place(g).unwrap();
        assert_eq!(ch.gradient(), g);
        assert!(ch.buffer().pixels().iter().all(|&p| p == Color::CYAN));
    }

    #[test]
    fn repalette_refuses_flat_red() {
        let area = rect(-2.0, -2.0, 4.0, 4.0);
        let mut ch = ChannelRenderer::new(8, 8, NormalComponent::X).unwrap();
        ch.set_gradient(Gradient::new(Color::rgb(50, 0, 0), Color::rgb(50, 255, 255)));
        ch.render(&bowl, area, 2).unwrap();
        let before = ch.buffer().clone();
        match ch.repalette_in_place(Gradient::default()) {
            Err(Error::DegenerateGradient) => {}
            other => panic!("expected DegenerateGradient, got {:?}", other),
        }
        assert_eq!(ch.buffer(), &before);
    }

    #[test]
    fn repalette_from_red_ramp_tracks_full_render() {
        // Old gradient varies red over the full range, so recovering t
        // loses at most one step of truncation per pixel.
        let area = rect(-2.0, -2.0, 4.0, 4.0);
        let target = Gradient::new(Color::rgb(0, 0, 0), Color::rgb(255, 0, 0));
        let mut quick = ChannelRenderer::new(16, 16, NormalComponent::Y).unwrap();
        quick.render(&bowl, area, 2).unwrap();
        quick.repalette_in_place(target).unwrap();

        let mut full = ChannelRenderer::new(16, 16, NormalComponent::Y).unwrap();
        full.set_gradient(target);
        full.render(&bowl, area, 2).unwrap();

        for (q, f) in interior(quick.buffer()).iter().zip(interior(full.buffer()).iter()) {
            assert!((i32::from(q.r) - i32::from(f.r)).abs() <= 1);
        }
        assert!(boundary_is_fill(quick.buffer()));
        assert_eq!(quick.gradient(), target);
    }

    #[test]
    fn repalette_is_lossy_for_curved_fields() {
        // Red only spans 0..=2 in the old gradient, so at most three
        // values of t survive the round trip.
        let area = rect(-2.0, -2.0, 4.0, 4.0);
        let old = Gradient::new(Color::rgb(0, 0, 0), Color::rgb(2, 255, 0));
        let new = Gradient::default();

        let mut quick = ChannelRenderer::new(32, 32, NormalComponent::X).unwrap();
        quick.set_gradient(old);
        quick.render(&bowl, area, 4).unwrap();
        quick.repalette_in_place(new).unwrap();

        let mut full = ChannelRenderer::new(32, 32, NormalComponent::X).unwrap();
        full.set_gradient(new);
        full.render(&bowl, area, 4).unwrap();

        let reds = |r: &RasterBuffer| -> HashSet<u8> { interior(r).iter().map(|p| p.r).collect() };
        assert!(reds(quick.buffer()).len() <= 3);
        assert!(reds(full.buffer()).len() > 3);
        assert_ne!(quick.buffer(), full.buffer());
        assert!(boundary_is_fill(quick.buffer()));
    }

    #[test]
    fn save_writes_the_raster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nx.png");
        let mut ch = ChannelRenderer::new(6, 4, NormalComponent::X).unwrap();
        ch.render(&bowl, rect(-1.0, -1.0, 2.0, 2.0), 2).unwrap();
        ch.save(&path).unwrap();
        let back = image::open(&path).unwrap().to_rgba();
        assert_eq!(back.into_raw(), ch.buffer().to_rgba_bytes());
    }
}
