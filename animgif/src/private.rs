// private.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Private module for top-level items
use crate::block::{DisposalMethod, GraphicControl};
use crate::encode::{self, Screen};
use crate::error::{Error, Result};
use pix::rgb::{SRgb8, SRgba8};
use pix::Raster;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::fmt;

/// One frame of an animation
///
/// Pixels are treated as opaque RGB; alpha is ignored when encoding.
///
/// ## Example
/// ```
/// use animgif::Frame;
/// use pix::{rgb::SRgba8, Raster};
///
/// # fn main() -> Result<(), animgif::Error> {
/// let mut raster = Raster::with_clear(4, 4);
/// *raster.pixel_mut(1, 2) = SRgba8::new(0xFF, 0, 0, 0xFF);
/// let frame = Frame::new(raster, 50, 1)?;
/// assert_eq!(frame.delay_time_cs(), 50);
/// # Ok(())
/// # }
/// ```
pub struct Frame {
    /// Frame pixels
    raster: Raster<SRgba8>,
    /// Delay in centiseconds
    delay_time_cs: u16,
    /// Disposal method
    disposal_method: DisposalMethod,
}

/// An encoded frame, ready to assemble into an animation
///
/// Holds the image descriptor, local color table and compressed image data,
/// along with the frame's graphic control settings.  Encoded frames can be
/// kept and reused as long as the source pixels are unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBytes {
    /// Graphic control extension
    graphic_control: GraphicControl,
    /// Number of local color table entries
    color_table_len: usize,
    /// Encoded image bytes
    bytes: Vec<u8>,
}

/// Frames of an animation, plus screen settings
///
/// ## Example
/// ```
/// use animgif::{Animation, Frame};
/// use pix::{rgb::SRgb8, Raster};
///
/// # fn main() -> Result<(), animgif::Error> {
/// let red = Raster::with_pixels(1, 1, vec![SRgb8::new(0xFF, 0, 0)]);
/// let blue = Raster::with_pixels(1, 1, vec![SRgb8::new(0, 0, 0xFF)]);
/// let gif = Animation::new(vec![
///     Frame::with_rgb(&red, 25, 1)?,
///     Frame::with_rgb(&blue, 25, 1)?,
/// ])
/// .with_repeat_count(3)
/// .with_screen_size(1, 1)
/// .encode()?;
/// assert_eq!(&gif[..6], b"GIF89a");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Animation {
    /// Animation frames
    frames: Vec<Frame>,
    /// Number of repeats (0 means forever)
    repeat_count: u32,
    /// Advisory screen width
    screen_width: Option<u32>,
    /// Advisory screen height
    screen_height: Option<u32>,
}

/// Check frame delay
fn check_delay(delay: u32) -> Result<u16> {
    u16::try_from(delay).map_err(|_| Error::InvalidDelay(delay))
}

/// Check raster dimensions
fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width > u16::MAX.into() || height > u16::MAX.into() {
        Err(Error::InvalidDimensions(width, height))
    } else {
        Ok(())
    }
}

impl Clone for Frame {
    fn clone(&self) -> Self {
        Frame {
            raster: Raster::with_raster(&self.raster),
            delay_time_cs: self.delay_time_cs,
            disposal_method: self.disposal_method,
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Frame")
            .field("width", &self.raster.width())
            .field("height", &self.raster.height())
            .field("delay_time_cs", &self.delay_time_cs)
            .field("disposal_method", &self.disposal_method)
            .finish()
    }
}

impl Frame {
    /// Create a new frame.
    ///
    /// * `raster` Frame pixels.
    /// * `delay` Delay before the next frame, in centiseconds (`0..65536`).
    /// * `disposal` Disposal method (`0..=7`).
    pub fn new(
        raster: Raster<SRgba8>,
        delay: u32,
        disposal: u8,
    ) -> Result<Self> {
        check_dimensions(raster.width(), raster.height())?;
        let delay_time_cs = check_delay(delay)?;
        let disposal_method = DisposalMethod::try_from(disposal)?;
        Ok(Frame {
            raster,
            delay_time_cs,
            disposal_method,
        })
    }

    /// Create a new frame from an RGB raster
    pub fn with_rgb(
        raster: &Raster<SRgb8>,
        delay: u32,
        disposal: u8,
    ) -> Result<Self> {
        Frame::new(Raster::with_raster(raster), delay, disposal)
    }

    /// Create a new frame from a row-major buffer of 3 (RGB) or 4 (RGBA)
    /// channel pixels
    pub fn from_buffer(
        width: u32,
        height: u32,
        channels: usize,
        buffer: &[u8],
        delay: u32,
        disposal: u8,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        if channels != 3 && channels != 4 {
            return Err(Error::InvalidChannels(channels));
        }
        let len = width as usize * height as usize * channels;
        if buffer.len() != len {
            return Err(Error::InvalidBufferSize);
        }
        let pixels: Vec<SRgba8> = buffer
            .chunks_exact(channels)
            .map(|p| {
                let alpha = p.get(3).copied().unwrap_or(u8::MAX);
                SRgba8::new(p[0], p[1], p[2], alpha)
            })
            .collect();
        Frame::new(Raster::with_pixels(width, height, pixels), delay, disposal)
    }

    /// Get the frame pixels
    pub fn raster(&self) -> &Raster<SRgba8> {
        &self.raster
    }

    /// Get the delay, in centiseconds
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }

    /// Get the disposal method
    pub fn disposal_method(&self) -> DisposalMethod {
        self.disposal_method
    }

    /// Encode the frame
    pub fn encode(&self) -> Result<FrameBytes> {
        encode::encode_frame(self)
    }
}

impl FrameBytes {
    /// Create encoded frame bytes
    pub(crate) fn new(
        graphic_control: GraphicControl,
        color_table_len: usize,
        bytes: Vec<u8>,
    ) -> Self {
        FrameBytes {
            graphic_control,
            color_table_len,
            bytes,
        }
    }

    /// Get the graphic control extension
    pub fn graphic_control(&self) -> &GraphicControl {
        &self.graphic_control
    }

    /// Get the number of local color table entries
    pub fn color_table_len(&self) -> usize {
        self.color_table_len
    }

    /// Get the encoded bytes (image descriptor onward)
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Animation {
    /// Create a new animation
    pub fn new(frames: Vec<Frame>) -> Self {
        Animation {
            frames,
            ..Default::default()
        }
    }

    /// Set the number of times to repeat (0 means forever)
    pub fn with_repeat_count(mut self, repeat_count: u32) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    /// Set the advisory screen size
    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen_width = Some(width);
        self.screen_height = Some(height);
        self
    }

    /// Get the frames
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Add a frame
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Encode into a complete GIF file
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_animation(
            &self.frames,
            self.repeat_count,
            self.screen_width,
            self.screen_height,
        )
    }
}

/// Encode frames independently, keeping their order
pub fn encode_frames(frames: &[Frame]) -> Result<Vec<FrameBytes>> {
    #[cfg(feature = "rayon")]
    {
        frames.par_iter().map(encode::encode_frame).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        frames.iter().map(encode::encode_frame).collect()
    }
}

/// Encode frames into a complete GIF file.
///
/// * `frames` Animation frames, in display order.
/// * `repeat_count` Number of repeats (0 means forever); only written when
///   there is more than one frame.
/// * `screen_width` / `screen_height` Advisory screen size (default 0).
pub fn encode_animation(
    frames: &[Frame],
    repeat_count: u32,
    screen_width: Option<u32>,
    screen_height: Option<u32>,
) -> Result<Vec<u8>> {
    let screen_width = screen_width.unwrap_or(0);
    let screen_height = screen_height.unwrap_or(0);
    Screen::new(repeat_count, screen_width, screen_height)?;
    let frames = encode_frames(frames)?;
    encode::assemble(&frames, repeat_count, screen_width, screen_height)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    fn pixel(r: u8, g: u8, b: u8) -> Raster<SRgba8> {
        Raster::with_pixels(1, 1, vec![SRgba8::new(r, g, b, 0xFF)])
    }

    #[test]
    fn frame_limits() {
        assert!(Frame::new(pixel(0, 0, 0), 0, 0).is_ok());
        assert!(Frame::new(pixel(0, 0, 0), 65535, 7).is_ok());
        let err = Frame::new(pixel(0, 0, 0), 65536, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = Frame::new(pixel(0, 0, 0), 0, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let wide = Raster::with_clear(65536, 1);
        assert!(Frame::new(wide, 0, 0).is_err());
    }

    #[test]
    fn frame_buffer() {
        let rgb = [1, 2, 3, 4, 5, 6];
        let f = Frame::from_buffer(2, 1, 3, &rgb, 0, 1).unwrap();
        assert_eq!(f.raster().pixels()[1], SRgba8::new(4, 5, 6, 0xFF));
        let rgba = [1, 2, 3, 4, 5, 6, 7, 8];
        let f = Frame::from_buffer(1, 2, 4, &rgba, 0, 1).unwrap();
        assert_eq!(f.raster().pixels()[1], SRgba8::new(5, 6, 7, 8));
        assert_eq!(f.disposal_method(), DisposalMethod::Keep);
        let err = Frame::from_buffer(2, 2, 3, &rgb, 0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(Frame::from_buffer(3, 1, 2, &rgb, 0, 1).is_err());
    }

    #[test]
    fn frame_order() {
        let frames: Vec<Frame> = (0..5u8)
            .map(|i| Frame::new(pixel(i, i, i), u32::from(i) * 10, 1).unwrap())
            .collect();
        let encoded = encode_frames(&frames).unwrap();
        for (frame, fb) in frames.iter().zip(&encoded) {
            assert_eq!(fb.graphic_control().delay_time_cs(), frame.delay_time_cs());
            assert_eq!(fb, &frame.encode().unwrap());
        }
    }

    #[test]
    fn animation_validation() {
        let frames = vec![Frame::new(pixel(1, 1, 1), 0, 0).unwrap()];
        let anim = Animation::new(frames.clone()).with_repeat_count(65536);
        assert_eq!(anim.encode().unwrap_err().kind(), ErrorKind::Validation);
        let anim = Animation::new(frames.clone()).with_screen_size(65536, 1);
        assert!(anim.encode().is_err());
        assert!(encode_animation(&frames, 0, None, Some(70_000)).is_err());
        let gif = encode_animation(&frames, 0, None, None).unwrap();
        assert_eq!(&gif[6..10], [0, 0, 0, 0]);
    }

    #[test]
    fn frame_debug() {
        let frame = Frame::new(Raster::with_clear(3, 2), 40, 2).unwrap();
        let dbg = format!("{:?}", frame);
        assert!(dbg.starts_with("Frame {"), "{}", dbg);
        assert!(dbg.contains("width: 3"), "{}", dbg);
        assert!(dbg.contains("height: 2"), "{}", dbg);
        assert!(dbg.contains("delay_time_cs: 40"), "{}", dbg);
        assert!(dbg.contains("Background"), "{}", dbg);
        let err = Frame::new(Raster::with_clear(3, 2), 0, 9).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn animation_push() {
        let mut anim = Animation::default().with_screen_size(1, 1);
        assert!(anim.frames().is_empty());
        anim.push(Frame::new(pixel(1, 2, 3), 7, 1).unwrap());
        anim.push(Frame::new(pixel(4, 5, 6), 9, 1).unwrap());
        let delays: Vec<u16> =
            anim.frames().iter().map(|f| f.delay_time_cs()).collect();
        assert_eq!(delays, [7, 9]);
        let gif = anim.encode().unwrap();
        let expected = encode_animation(anim.frames(), 0, Some(1), Some(1));
        assert_eq!(gif, expected.unwrap());
        // two frames get a looping extension
        assert_eq!(&gif[13..16], [0x21, 0xFF, 0x0B]);
    }

    #[test]
    fn too_many_colors() {
        let pixels: Vec<SRgba8> = (0..257u32)
            .map(|i| SRgba8::new(i as u8, (i >> 8) as u8, 0, 0xFF))
            .collect();
        let raster = Raster::with_pixels(257, 1, pixels);
        let frame = Frame::new(raster, 0, 0).unwrap();
        let err = encode_animation(&[frame], 0, None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }
}
