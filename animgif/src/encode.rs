// encode.rs
//
// Copyright (c) 2026  Douglas Lau
//
use crate::bits::le_bytes;
use crate::block::*;
use crate::error::{Error, Result};
use crate::lzw;
use crate::palette::{index_raster, ColorTable, Indexed};
use crate::private::{Frame, FrameBytes};

/// Maximum length of a data sub-block
const MAX_SUB_BLOCK: u8 = 0xFF;

/// Split data into sub-blocks.
///
/// Each run of up to `max_len` bytes is preceded by its length.  The block
/// terminator is not included.
pub fn chunkify(data: &[u8], max_len: u8) -> Vec<u8> {
    let max_len = usize::from(max_len.max(1));
    let mut buf = Vec::with_capacity(data.len() + data.len() / max_len + 1);
    for chunk in data.chunks(max_len) {
        buf.push(chunk.len() as u8); // block size
        buf.extend_from_slice(chunk);
    }
    buf
}

/// Write data as sub-blocks, followed by a block terminator
fn format_sub_blocks(data: &[u8], buf: &mut Vec<u8>) {
    buf.extend(chunkify(data, MAX_SUB_BLOCK));
    buf.push(0); // block size
}

/// Write a 16-bit little-endian value
fn format_u16(value: u16, buf: &mut Vec<u8>) -> Result<()> {
    buf.extend(le_bytes(value.into(), 2)?);
    Ok(())
}

impl Header {
    fn format(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.extend_from_slice(b"GIF");
        buf.extend_from_slice(&self.version());
        Ok(())
    }
}

impl LogicalScreenDesc {
    fn format(&self, buf: &mut Vec<u8>) -> Result<()> {
        format_u16(self.screen_width(), buf)?;
        format_u16(self.screen_height(), buf)?;
        buf.push(self.flags()?);
        buf.push(self.background_color_idx());
        buf.push(self.pixel_aspect_ratio());
        Ok(())
    }
}

impl Application {
    fn format(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.push(BlockCode::Extension_.signature());
        buf.push(ExtensionCode::Application_.into());
        for c in self.app_data() {
            buf.push(u8::try_from(c.len())?); // block size
            buf.extend_from_slice(c);
        }
        buf.push(0); // block size
        Ok(())
    }
}

impl GraphicControl {
    fn format(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.push(BlockCode::Extension_.signature());
        buf.push(ExtensionCode::GraphicControl_.into());
        buf.push(4); // block size
        buf.push(self.flags()?);
        format_u16(self.delay_time_cs(), buf)?;
        buf.push(self.transparent_color_idx());
        buf.push(0); // block size
        Ok(())
    }
}

impl ImageDesc {
    fn format(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.push(BlockCode::ImageDesc_.signature());
        format_u16(self.left(), buf)?;
        format_u16(self.top(), buf)?;
        format_u16(self.width(), buf)?;
        format_u16(self.height(), buf)?;
        buf.push(self.flags()?);
        Ok(())
    }
}

impl ColorTable {
    fn format(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.extend_from_slice(self.colors());
        Ok(())
    }
}

impl ImageData {
    fn format(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.push(self.min_code_size());
        format_sub_blocks(self.data(), buf);
        Ok(())
    }
}

impl Trailer {
    fn format(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.push(BlockCode::Trailer_.signature());
        Ok(())
    }
}

/// Encode one frame.
///
/// The result holds the image descriptor, local color table and image data;
/// the graphic control extension is added when the animation is assembled.
pub fn encode_frame(frame: &Frame) -> Result<FrameBytes> {
    let raster = frame.raster();
    let width = u16::try_from(raster.width())?;
    let height = u16::try_from(raster.height())?;
    let Indexed { indices, palette } = index_raster(raster)?;
    let tbl = ColorTable::new(&palette)?;
    let data = lzw::compress(&indices, tbl.min_code_size())?;
    let image_desc = ImageDesc::default()
        .with_width(width)
        .with_height(height)
        .with_color_table(&tbl);
    let image_data = ImageData::new(tbl.min_code_size(), data);
    let mut bytes = Vec::with_capacity(
        10 + tbl.colors().len() + image_data.data().len() * 256 / 255 + 3,
    );
    image_desc.format(&mut bytes)?;
    tbl.format(&mut bytes)?;
    image_data.format(&mut bytes)?;
    debug!(
        "encoded {}x{} frame: {} colors, {} bytes",
        width,
        height,
        palette.len(),
        bytes.len()
    );
    let graphic_control = GraphicControl::default()
        .with_delay_time_cs(frame.delay_time_cs())
        .with_disposal_method(frame.disposal_method());
    Ok(FrameBytes::new(graphic_control, tbl.len(), bytes))
}

/// Screen settings for an animation
#[derive(Clone, Copy, Debug)]
pub(crate) struct Screen {
    /// Loop count (0 means forever)
    repeat_count: u16,
    /// Advisory screen width
    width: u16,
    /// Advisory screen height
    height: u16,
}

impl Screen {
    /// Validate screen settings
    pub fn new(repeat_count: u32, width: u32, height: u32) -> Result<Self> {
        let dims = || Error::InvalidDimensions(width, height);
        Ok(Screen {
            repeat_count: u16::try_from(repeat_count)
                .map_err(|_| Error::InvalidRepeatCount(repeat_count))?,
            width: u16::try_from(width).map_err(|_| dims())?,
            height: u16::try_from(height).map_err(|_| dims())?,
        })
    }
}

/// Assemble encoded frames into a complete GIF file
pub fn assemble(
    frames: &[FrameBytes],
    repeat_count: u32,
    screen_width: u32,
    screen_height: u32,
) -> Result<Vec<u8>> {
    let screen = Screen::new(repeat_count, screen_width, screen_height)?;
    let len = frames.iter().map(|f| f.bytes().len() + 8).sum::<usize>();
    let mut buf = Vec::with_capacity(13 + 19 + len + 1);
    Header::default().format(&mut buf)?;
    LogicalScreenDesc::default()
        .with_screen_width(screen.width)
        .with_screen_height(screen.height)
        .format(&mut buf)?;
    if frames.len() > 1 {
        Application::with_loop_count(screen.repeat_count).format(&mut buf)?;
    }
    for frame in frames {
        frame.graphic_control().format(&mut buf)?;
        buf.extend_from_slice(frame.bytes());
    }
    Trailer::default().format(&mut buf)?;
    debug!("assembled {} frames: {} bytes", frames.len(), buf.len());
    Ok(buf)
}
