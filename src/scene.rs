// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The four channels of one field, rendered and recolored together.

use log::{debug, info, warn};
use std::path::Path;

use crate::channel::ChannelRenderer;
use crate::color::Gradient;
use crate::error::Error;
use crate::field::ScalarField;
use crate::normal::NormalComponent;
use crate::planes::DomainRect;
use crate::raster::write_rgba;

/// Owns a field, the domain rectangle it is viewed through, and one
/// `ChannelRenderer` per normal component, in X, Y, Z, W order.
pub struct RenderSet<F> {
    field: F,
    rect: DomainRect,
    threads: usize,
    channels: Vec<ChannelRenderer>,
}

impl<F: ScalarField> RenderSet<F> {
    /// Binds `field` and `rect` to four `width` x `height` channels.
    /// `threads` is the total worker budget for a render.
    pub fn new(
        field: F,
        rect: DomainRect,
        width: usize,
        height: usize,
        threads: usize,
    ) -> Result<Self, Error> {
        rect.validate()?;
        let channels = NormalComponent::ALL
            .iter()
            .map(|&c| ChannelRenderer::new(width, height, c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RenderSet {
            field,
            rect,
            threads: threads.max(1),
            channels,
        })
    }

    /// The channels, in X, Y, Z, W order.
    pub fn channels(&self) -> &[ChannelRenderer] {
        &self.channels
    }

    /// The channel showing `component`.
    pub fn channel(&self, component: NormalComponent) -> &ChannelRenderer {
        &self.channels[component.index()]
    }

    /// The domain rectangle being rendered.
    pub fn rect(&self) -> DomainRect {
        self.rect
    }

    /// Renders all four channels.  With at least one thread per channel
    /// they run at once, one worker per channel, each splitting its rows
    /// across its share of the thread budget.  With fewer threads the
    /// channels are rendered one after another, each using the whole
    /// budget, so no more than `threads` workers ever run.
    pub fn render_all(&mut self) -> Result<(), Error> {
        if self.threads < self.channels.len() {
            for channel in &mut self.channels {
                channel.render(&self.field, self.rect, self.threads)?;
            }
            debug!(
                "rendered {} channels in turn with {} threads",
                self.channels.len(),
                self.threads
            );
            return Ok(());
        }

        let per_channel = (self.threads / self.channels.len()).max(1);
        let field = &self.field;
        let rect = self.rect;
        let channels = &mut self.channels;

        let results = crossbeam::scope(|spawner| {
            let handles: Vec<_> = channels
                .iter_mut()
                .map(|channel| spawner.spawn(move |_| channel.render(field, rect, per_channel)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(Err(Error::WorkerPanicked)))
                .collect::<Vec<_>>()
        })
        .map_err(|_| Error::WorkerPanicked)?;

        debug!(
            "rendered {} channels with {} threads each",
            results.len(),
            per_channel
        );
        results.into_iter().collect()
    }

    /// Switches every channel to `gradient` and renders from scratch.
    pub fn update_gradient(&mut self, gradient: Gradient) -> Result<(), Error> {
        for channel in &mut self.channels {
            channel.set_gradient(gradient);
        }
        self.render_all()
    }

    /// Recolors every channel in place, see
    /// `ChannelRenderer::repalette_in_place`.  If the current gradient
    /// cannot be inverted the channels are rendered again instead.
    pub fn repalette_all(&mut self, gradient: Gradient) -> Result<(), Error> {
        let invertible = self
            .channels
            .iter()
            .all(|c| c.gradient().first.r != c.gradient().second.r);
        if !invertible {
            warn!("current gradient cannot be inverted; rendering again");
            return self.update_gradient(gradient);
        }
        for channel in &mut self.channels {
            channel.repalette_in_place(gradient)?;
        }
        Ok(())
    }

    /// Writes each channel to `dir`, as `nx.png`, `ny.png`, `nz.png`
    /// and `nw.png`.
    pub fn save_channels<P: AsRef<Path>>(&self, dir: P) -> Result<(), Error> {
        for channel in &self.channels {
            let path = dir.as_ref().join(format!("{}.png", channel.component().name()));
            channel.save(path)?;
        }
        Ok(())
    }

    /// Tiles the four channels two by two, X and Y on top, Z and W
    /// below, into the RGBA bytes of one image.  Returns the bytes with
    /// the composite width and height.
    pub fn composite(&self) -> (Vec<u8>, usize, usize) {
        let (w, h) = {
            let first = self.channels[0].buffer();
            (first.width(), first.height())
        };
        let (cw, ch) = (w * 2, h * 2);
        let mut bytes = vec![0 as u8; cw * ch * 4];
        for (i, channel) in self.channels.iter().enumerate() {
            let (ox, oy) = ((i % 2) * w, (i / 2) * h);
            for (y, row) in channel.buffer().pixels().chunks(w).enumerate() {
                for (x, color) in row.iter().enumerate() {
                    let at = ((oy + y) * cw + ox + x) * 4;
                    bytes[at..at + 4].copy_from_slice(&color.to_array());
                }
            }
        }
        (bytes, cw, ch)
    }

    /// Writes the two-by-two composite to `path`.
    pub fn save_composite<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let (bytes, w, h) = self.composite();
        write_rgba(path.as_ref(), &bytes, w, h)?;
        info!("saved composite of {} channels", self.channels.len());
        Ok(())
    }
}
