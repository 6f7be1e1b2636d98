// palette.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Color indexing and color tables
use crate::error::{Error, Result};
use pix::el::Pixel;
use pix::rgb::{SRgb8, SRgba8};
use pix::Raster;
use std::collections::HashMap;

/// Number of channels in a color table entry
const CHANNELS: usize = 3;

/// Maximum number of entries in a GIF color table
pub const MAX_COLORS: usize = 256;

/// Distinct colors of a frame, in order of first appearance
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
    colors: Vec<SRgb8>,
}

/// Frame pixels converted to palette indices
#[derive(Clone, Debug)]
pub struct Indexed {
    /// Palette index of each pixel (row-major)
    pub indices: Vec<u8>,
    /// Colors referenced by the indices
    pub palette: Palette,
}

/// Color table configuration and data
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable {
    /// Flattened RGB entries, padded to a power of two
    colors: Vec<u8>,
    /// LZW minimum code size
    min_code_size: u8,
}

/// Get the red, green and blue channels of a color
fn rgb_of<P: Pixel>(clr: &P) -> [u8; 3]
where
    u8: From<P::Chan>,
{
    let ch = clr.channels();
    [u8::from(ch[0]), u8::from(ch[1]), u8::from(ch[2])]
}

impl Palette {
    /// Create a palette from a slice of colors
    ///
    /// Duplicate colors are kept; this is not checked.
    pub fn with_colors(colors: &[SRgb8]) -> Self {
        Palette {
            colors: colors.to_vec(),
        }
    }

    /// Get the number of colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the colors
    pub fn colors(&self) -> &[SRgb8] {
        &self.colors
    }
}

/// Convert a raster into palette indices.
///
/// Colors are numbered in the order they first appear.  Alpha is ignored, but
/// a warning is logged once if any pixel is not fully opaque.
pub fn index_raster(raster: &Raster<SRgba8>) -> Result<Indexed> {
    let pixels = raster.pixels();
    let mut indices = Vec::with_capacity(pixels.len());
    let mut colors = Vec::new();
    let mut lookup = HashMap::new();
    let mut opaque = true;
    for p in pixels {
        if opaque && u8::from(p.channels()[3]) != u8::MAX {
            warn!("non-opaque pixels: alpha will be ignored");
            opaque = false;
        }
        let rgb = rgb_of(p);
        let idx = match lookup.get(&rgb) {
            Some(idx) => *idx,
            None => {
                if colors.len() >= MAX_COLORS {
                    return Err(Error::TooManyColors);
                }
                let idx = colors.len() as u8;
                colors.push(SRgb8::new(rgb[0], rgb[1], rgb[2]));
                lookup.insert(rgb, idx);
                idx
            }
        };
        indices.push(idx);
    }
    let palette = Palette { colors };
    Ok(Indexed { indices, palette })
}

/// Get the number of bits needed to index `n` entries
fn index_bits(n: usize) -> u8 {
    let mut bits = 0;
    while (1 << bits) < n {
        bits += 1;
    }
    bits
}

impl ColorTable {
    /// Build a color table from a palette.
    ///
    /// An empty palette produces an empty table.  Otherwise the table has at
    /// least 2 entries and is padded with black to a power of two.
    pub fn new(palette: &Palette) -> Result<Self> {
        let len = palette.len();
        if len > MAX_COLORS {
            return Err(Error::TooManyColors);
        }
        if len == 0 {
            return Ok(ColorTable {
                colors: Vec::new(),
                min_code_size: 2,
            });
        }
        let bits = index_bits(len.max(2));
        let table_len = 1 << bits;
        let mut colors = Vec::with_capacity(table_len * CHANNELS);
        for clr in palette.colors() {
            colors.extend_from_slice(&rgb_of(clr));
        }
        colors.resize(table_len * CHANNELS, 0);
        let min_code_size = bits.max(2);
        Ok(ColorTable {
            colors,
            min_code_size,
        })
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.colors.len() / CHANNELS
    }

    /// Check if the table is empty (not present)
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the flattened RGB entries
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }

    /// Get the encoded size field (table length is `2 << len_bits`)
    pub fn len_bits(&self) -> u8 {
        index_bits(self.len()).saturating_sub(1)
    }

    /// Get the LZW minimum code size
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::Cell;

    thread_local! {
        /// Warnings logged on the current thread
        static WARNINGS: Cell<usize> = Cell::new(0);
    }

    /// Logger counting warnings per thread
    struct WarnCounter;

    impl log::Log for WarnCounter {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.with(|w| w.set(w.get() + 1));
            }
        }
        fn flush(&self) {}
    }

    static LOGGER: WarnCounter = WarnCounter;

    /// Count warnings logged while running a closure
    fn count_warnings<F: FnOnce()>(f: F) -> usize {
        // another test may have installed the logger already
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Warn);
        WARNINGS.with(|w| w.set(0));
        f();
        WARNINGS.with(|w| w.get())
    }

    fn raster(colors: &[(u8, u8, u8)]) -> Raster<SRgba8> {
        let pixels: Vec<SRgba8> = colors
            .iter()
            .map(|(r, g, b)| SRgba8::new(*r, *g, *b, 255))
            .collect();
        Raster::with_pixels(pixels.len() as u32, 1, pixels)
    }

    fn palette_of(n: usize) -> Palette {
        let colors: Vec<SRgb8> =
            (0..n).map(|i| SRgb8::new(i as u8, 0, 0)).collect();
        Palette::with_colors(&colors)
    }

    #[test]
    fn first_seen_order() {
        let r = raster(&[(9, 9, 9), (1, 2, 3), (9, 9, 9), (0, 0, 0)]);
        let indexed = index_raster(&r).unwrap();
        assert_eq!(indexed.indices, [0, 1, 0, 2]);
        assert_eq!(
            indexed.palette.colors(),
            [
                SRgb8::new(9, 9, 9),
                SRgb8::new(1, 2, 3),
                SRgb8::new(0, 0, 0)
            ]
        );
        let again = index_raster(&r).unwrap();
        assert_eq!(again.indices, indexed.indices);
        assert_eq!(again.palette, indexed.palette);
    }

    #[test]
    fn alpha_ignored() {
        let pixels = vec![SRgba8::new(10, 20, 30, 0), SRgba8::new(10, 20, 30, 255)];
        let r = Raster::with_pixels(2, 1, pixels);
        let indexed = index_raster(&r).unwrap();
        assert_eq!(indexed.indices, [0, 0]);
        assert_eq!(indexed.palette.colors(), [SRgb8::new(10, 20, 30)]);
    }

    #[test]
    fn alpha_warning() {
        let translucent: Vec<SRgba8> = (0..16u8)
            .map(|i| SRgba8::new(i, 0, 0, i * 8))
            .collect();
        let translucent = Raster::with_pixels(4, 4, translucent);
        let opaque = raster(&[(1, 2, 3), (4, 5, 6)]);
        let n = count_warnings(|| {
            index_raster(&opaque).unwrap();
        });
        assert_eq!(n, 0);
        let n = count_warnings(|| {
            index_raster(&translucent).unwrap();
        });
        assert_eq!(n, 1);
        let n = count_warnings(|| {
            index_raster(&translucent).unwrap();
            index_raster(&opaque).unwrap();
            index_raster(&translucent).unwrap();
        });
        assert_eq!(n, 2);
    }

    #[test]
    fn too_many_colors() {
        let colors: Vec<_> = (0..257u32)
            .map(|i| ((i & 0xFF) as u8, (i >> 8) as u8, 0))
            .collect();
        let err = index_raster(&raster(&colors)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        let indexed = index_raster(&raster(&colors[..256])).unwrap();
        assert_eq!(indexed.palette.len(), 256);
        assert_eq!(indexed.indices[255], 255);
        let err = ColorTable::new(&palette_of(257)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }

    #[test]
    fn table_len() {
        for k in 1..=256 {
            let tbl = ColorTable::new(&palette_of(k)).unwrap();
            let expected = k.max(2).next_power_of_two();
            assert_eq!(tbl.len(), expected, "{} colors", k);
            assert_eq!(tbl.colors().len(), expected * 3);
            assert_eq!(2 << tbl.len_bits(), expected);
            assert!(tbl.min_code_size() >= 2);
            assert!(1 << tbl.min_code_size() >= k);
        }
    }

    #[test]
    fn code_size() {
        let sizes = [
            (1, 2, 0),
            (2, 2, 0),
            (3, 2, 1),
            (4, 2, 1),
            (5, 3, 2),
            (16, 4, 3),
            (17, 5, 4),
            (129, 8, 7),
            (256, 8, 7),
        ];
        for (k, min_code_size, len_bits) in sizes {
            let tbl = ColorTable::new(&palette_of(k)).unwrap();
            assert_eq!(tbl.min_code_size(), min_code_size, "{} colors", k);
            assert_eq!(tbl.len_bits(), len_bits, "{} colors", k);
        }
    }

    #[test]
    fn single_color() {
        let pal = Palette::with_colors(&[SRgb8::new(0xFF, 0x80, 0x00)]);
        let tbl = ColorTable::new(&pal).unwrap();
        assert_eq!(tbl.min_code_size(), 2);
        assert_eq!(tbl.len(), 2);
        assert_eq!(tbl.colors(), [0xFF, 0x80, 0x00, 0, 0, 0]);
    }

    #[test]
    fn empty() {
        let tbl = ColorTable::new(&Palette::default()).unwrap();
        assert!(tbl.is_empty());
        assert_eq!(tbl.len(), 0);
        assert_eq!(tbl.len_bits(), 0);
        assert_eq!(tbl.min_code_size(), 2);
    }
}
