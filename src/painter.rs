use image::{Rgb, RgbImage};

use crate::solver::IterationMap;

pub trait Painter {
    type Output;

    fn paint(&self, map: &IterationMap) -> Self::Output;
}

/// Maps an iteration count in `0..=max` to a colour.
pub trait ColorScale {
    fn color(&self, count: u32, max: u32) -> Rgb<u8>;
}

pub struct Greyscale;

impl ColorScale for Greyscale {
    fn color(&self, count: u32, max: u32) -> Rgb<u8> {
        let frac = (count as f64 / max as f64).clamp(0.0, 1.0);
        let v: u8 = 255 - (frac * 255.0).round() as u8;
        Rgb([v, v, v])
    }
}

pub struct Rainbow;

const RAINBOW: [[u8; 3]; 10] = [
    [0xbe, 0x0a, 0xff],
    [0x58, 0x0a, 0xff],
    [0x14, 0x7d, 0xf5],
    [0x0a, 0xef, 0xff],
    [0x0a, 0xff, 0x99],
    [0xa1, 0xff, 0x0a],
    [0xde, 0xff, 0x0a],
    [0xff, 0xd3, 0x00],
    [0xff, 0x87, 0x00],
    [0xff, 0x00, 0x00],
];

fn mix(a: u8, b: u8, frac: f64) -> u8 {
    let m = a as f64 * (1.0 - frac) + b as f64 * frac;
    m.round() as u8
}

impl ColorScale for Rainbow {
    fn color(&self, count: u32, max: u32) -> Rgb<u8> {
        let steps = (RAINBOW.len() - 1) as f64;
        let pos = (count as f64 / max as f64).clamp(0.0, 1.0) * steps;
        let n = pos.floor() as usize;
        let frac = pos - n as f64;
        let rgb1 = RAINBOW[n];
        let rgb2 = RAINBOW[(n + 1).min(RAINBOW.len() - 1)];
        Rgb([
            mix(rgb1[0], rgb2[0], frac),
            mix(rgb1[1], rgb2[1], frac),
            mix(rgb1[2], rgb2[2], frac),
        ])
    }
}

/// Colours escaped points by count; points that never escaped are black.
pub struct IValuePainter<C> {
    color: C,
    max_i_value: u32,
}

impl<C: ColorScale> IValuePainter<C> {
    /// Counts at or above `max_i_value` get the top colour of the scale.
    pub fn new(color: C, max_i_value: u32) -> Self {
        Self {
            color,
            max_i_value: max_i_value.max(1),
        }
    }
}

impl<C: ColorScale> Painter for IValuePainter<C> {
    type Output = RgbImage;

    fn paint(&self, map: &IterationMap) -> RgbImage {
        let mut img = RgbImage::new(map.width() as u32, map.height() as u32);
        for ((row, col), &count) in map.view().indexed_iter() {
            let color = if count >= map.limit() {
                Rgb([0, 0, 0])
            } else {
                self.color.color(count, self.max_i_value)
            };
            img.put_pixel(col as u32, row as u32, color);
        }
        img
    }
}

/// One character per point: `' ' + count` for counts below
/// `min(limit, 96)`, a blank otherwise.
pub struct AsciiPainter;

pub const ASCII_MAX_DISPLAYED: u32 = 96;

impl Painter for AsciiPainter {
    type Output = String;

    fn paint(&self, map: &IterationMap) -> String {
        let max_displayed = map.limit().min(ASCII_MAX_DISPLAYED);
        let mut out = String::with_capacity((map.width() + 1) * map.height());
        for row in map.view().rows() {
            for &count in row {
                let c = if count >= max_displayed {
                    ' '
                } else {
                    char::from(b' ' + count as u8)
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord::{Geometry, Resolution};
    use crate::generate;

    fn small_map() -> IterationMap {
        let geometry = Geometry::initial(Resolution::new(8, 4));
        generate::<f64>(&geometry, 50).unwrap()
    }

    #[test]
    fn test_ascii() {
        let map = small_map();
        let text = AsciiPainter.paint(&map);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.chars().count() == 8));
        // -2-2i escapes before the first iteration
        assert_eq!(lines[0].chars().next(), Some(' '));
        // 0+0i never escapes
        assert_eq!(lines[2].chars().nth(4), Some(' '));
        assert!(text.chars().any(|c| c != ' ' && c != '\n'));
    }

    #[test]
    fn test_image() {
        let map = small_map();
        let img = IValuePainter::new(Rainbow, 20).paint(&map);
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(*img.get_pixel(4, 2), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(0, 0), Rgb(RAINBOW[0]));
    }

    #[test]
    fn test_scales() {
        assert_eq!(Greyscale.color(0, 10), Rgb([255, 255, 255]));
        assert_eq!(Greyscale.color(10, 10), Rgb([0, 0, 0]));
        assert_eq!(Rainbow.color(100, 10), Rgb(RAINBOW[9]));
        assert_eq!(Rainbow.color(0, 10), Rgb(RAINBOW[0]));
    }
}
