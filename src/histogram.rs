//! Per-channel intensity histograms, their line-chart rendering, and
//! histogram-driven color correction.
//!
//! A [`Histogram`] is an immutable snapshot taken once from a source image.
//! Rendering and color correction are independent consumers of it.

use ndarray::{Array3, Axis};
use rayon::prelude::*;

use crate::image::{clamp_channel, Image, Pixel, CHANNELS};

/// Number of bins per channel.
pub const BINS: usize = 256;

/// Side length of the rendered histogram chart.
pub const CHART_SIZE: usize = 256;

/// Spacing of the chart gridlines in pixels.
const GRID_SPACING: usize = 16;

/// Bins considered when locating a meaningful peak. Bins outside this range
/// are usually clipping spikes.
const PEAK_RANGE: std::ops::Range<usize> = 10..245;

const BACKGROUND: u8 = 255;
const GRID_COLOR: [u8; 3] = [192, 192, 192];
const CHANNEL_COLORS: [[u8; 3]; CHANNELS] = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];

type Counts = [[usize; BINS]; CHANNELS];

/// A color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red channel.
    Red = 0,
    /// Green channel.
    Green = 1,
    /// Blue channel.
    Blue = 2,
}

impl Channel {
    /// All channels in RGB order.
    pub const ALL: [Channel; CHANNELS] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// Frequency of every channel value, one row of 256 bins per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Counts,
}

impl Histogram {
    /// Count every channel value of `image`.
    pub fn new(image: &Image) -> Self {
        let counts = image
            .as_array()
            .axis_iter(Axis(0))
            .into_par_iter()
            .fold(
                || [[0usize; BINS]; CHANNELS],
                |mut local, row| {
                    for px in row.lanes(Axis(1)) {
                        for c in 0..CHANNELS {
                            local[c][px[c] as usize] += 1;
                        }
                    }
                    local
                },
            )
            .reduce(
                || [[0usize; BINS]; CHANNELS],
                |mut a, b| {
                    for (row_a, row_b) in a.iter_mut().zip(b.iter()) {
                        for (x, y) in row_a.iter_mut().zip(row_b.iter()) {
                            *x += y;
                        }
                    }
                    a
                },
            );

        Self { counts }
    }

    /// Bins of one channel.
    pub fn counts(&self, channel: Channel) -> &[usize; BINS] {
        &self.counts[channel as usize]
    }

    /// Largest count over all channels and bins.
    pub fn max_count(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Bin with the highest count inside `10..245`.
    ///
    /// Ties keep the lowest bin. Returns 0 when every bin in range is empty.
    pub fn meaningful_peak(&self, channel: Channel) -> usize {
        let row = self.counts(channel);
        let mut peak = 0;
        let mut max_count = 0;
        for i in PEAK_RANGE {
            if row[i] > max_count {
                max_count = row[i];
                peak = i;
            }
        }
        peak
    }

    /// Render the histogram as a 256x256 line chart.
    ///
    /// Counts are scaled by the single largest count across all channels.
    /// An empty histogram renders the background and grid only.
    pub fn render(&self) -> Image {
        let mut canvas = Array3::<u8>::from_elem((CHART_SIZE, CHART_SIZE, CHANNELS), BACKGROUND);

        let edge = CHART_SIZE as i64;
        for i in 1..CHART_SIZE / GRID_SPACING {
            let offset = (i * GRID_SPACING) as i64;
            draw_line(&mut canvas, (offset, 0), (offset, edge), GRID_COLOR);
            draw_line(&mut canvas, (0, offset), (edge, offset), GRID_COLOR);
        }

        let max_count = self.max_count();
        for channel in Channel::ALL {
            let heights = self.scaled_heights(channel, max_count);
            let color = CHANNEL_COLORS[channel as usize];
            for i in 0..BINS - 1 {
                draw_line(
                    &mut canvas,
                    (i as i64, edge - heights[i]),
                    (i as i64 + 1, edge - heights[i + 1]),
                    color,
                );
            }
        }

        log::debug!("rendered histogram chart, max count {max_count}");
        Image::from_array_unchecked(canvas)
    }

    fn scaled_heights(&self, channel: Channel, max_count: usize) -> [i64; BINS] {
        let mut heights = [0i64; BINS];
        if max_count == 0 {
            return heights;
        }
        for (h, &count) in heights.iter_mut().zip(self.counts(channel).iter()) {
            *h = (count * CHART_SIZE / max_count) as i64;
        }
        heights
    }
}

/// Set a pixel if it lies on the canvas.
#[inline]
fn set_pixel(canvas: &mut Array3<u8>, x: i64, y: i64, color: [u8; 3]) {
    let (height, width, _) = canvas.dim();
    if x >= 0 && x < width as i64 && y >= 0 && y < height as i64 {
        for (c, &v) in color.iter().enumerate() {
            canvas[[y as usize, x as usize, c]] = v;
        }
    }
}

/// Bresenham line, clipped to the canvas.
fn draw_line(canvas: &mut Array3<u8>, p0: (i64, i64), p1: (i64, i64), color: [u8; 3]) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        set_pixel(canvas, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Build the histogram of `image`.
pub fn histogram(image: &Image) -> Histogram {
    log::debug!("histogram of {}x{} image", image.width(), image.height());
    Histogram::new(image)
}

/// Render the histogram of `image` as a 256x256 chart.
pub fn visualize(image: &Image) -> Image {
    histogram(image).render()
}

/// Shift every channel so that its meaningful peak lands on the average peak.
///
/// The histogram is taken from `image` itself.
pub fn color_correct(image: &Image) -> Image {
    color_correct_with(&histogram(image), image)
}

/// Color-correct `image` using peaks from a precomputed histogram.
pub fn color_correct_with(hist: &Histogram, image: &Image) -> Image {
    let peaks = Channel::ALL.map(|c| hist.meaningful_peak(c) as i32);
    let average = (peaks[0] + peaks[1] + peaks[2]) / 3;
    let offsets = peaks.map(|p| average - p);
    log::trace!("color correction peaks {peaks:?} average {average} offsets {offsets:?}");

    image.map_pixels(|p| {
        Pixel::new(
            clamp_channel(p.red as i32 + offsets[0]),
            clamp_channel(p.green as i32 + offsets[1]),
            clamp_channel(p.blue as i32 + offsets[2]),
        )
    })
}
