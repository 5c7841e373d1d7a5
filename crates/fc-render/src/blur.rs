//! Separable gaussian blur over premultiplied RGBA8 pixmaps.
//!
//! Weights are quantized to Q16 fixed point so results are deterministic
//! across platforms. Edges clamp to the nearest pixel.

use tiny_skia::Pixmap;

/// Blur `pixmap` in place. `radius` is in pixels; sigma is half of it.
/// Taps never reach past the larger pixmap dimension.
pub fn blur_pixmap(pixmap: &mut Pixmap, radius: f32) {
    let r = radius.ceil();
    if !r.is_finite() || r < 1.0 {
        return;
    }
    let (w, h) = (pixmap.width() as usize, pixmap.height() as usize);
    let reach = r.min(w.max(h) as f32) as u32;
    let kernel = kernel_q16(reach, (radius / 2.0).max(0.5));

    let mut tmp = vec![0u8; w * h * 4];
    pass(pixmap.data(), &mut tmp, w, h, &kernel, Direction::Horizontal);
    pass(&tmp, pixmap.data_mut(), w, h, &kernel, Direction::Vertical);
}

#[derive(Clone, Copy)]
enum Direction {
    Horizontal,
    Vertical,
}

/// Normalized gaussian weights summing to exactly `1 << 16`.
fn kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let r = radius as i32;
    let denom = 2.0 * (sigma as f64).powi(2);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-(i as f64).powi(2) / denom).exp())
        .collect();
    let sum: f64 = raw.iter().sum();

    let mut weights: Vec<u32> = raw
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - total).clamp(0, 65536) as u32;
    weights
}

fn pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32], dir: Direction) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &weight) in k.iter().enumerate() {
                let d = ki as isize - radius;
                let (sx, sy) = match dir {
                    Direction::Horizontal => ((x as isize + d).clamp(0, w as isize - 1) as usize, y),
                    Direction::Vertical => (x, (y as isize + d).clamp(0, h as isize - 1) as usize),
                };
                let i = (sy * w + sx) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(weight) * u64::from(src[i + c]);
                }
            }
            let o = (y * w + x) * 4;
            for c in 0..4 {
                dst[o + c] = ((acc[c] + 32768) >> 16).min(255) as u8;
            }
        }
    }
}
