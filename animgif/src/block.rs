// block.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! GIF blocks produced by the encoder
use crate::bits::pack_byte;
use crate::error::{Error, Result};
use crate::palette::ColorTable;

/// Frame disposal method
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DisposalMethod {
    /// No disposal specified (static image)
    #[default]
    NoAction,
    /// Keep the frame, drawing the next one on top
    Keep,
    /// Restore to background color
    Background,
    /// Restore to previous state
    Previous,
    /// Reserved value (4-7)
    Reserved(u8),
}

impl TryFrom<u8> for DisposalMethod {
    type Error = Error;

    fn try_from(n: u8) -> Result<Self> {
        use self::DisposalMethod::*;
        match n {
            0 => Ok(NoAction),
            1 => Ok(Keep),
            2 => Ok(Background),
            3 => Ok(Previous),
            4..=7 => Ok(Reserved(n)),
            _ => Err(Error::InvalidDisposal(n)),
        }
    }
}

impl From<DisposalMethod> for u8 {
    fn from(d: DisposalMethod) -> Self {
        use self::DisposalMethod::*;
        match d {
            NoAction => 0,
            Keep => 1,
            Background => 2,
            Previous => 3,
            Reserved(n) => n & 0b0111,
        }
    }
}

/// Block introducer codes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    Extension_,
    ImageDesc_,
    Trailer_,
}

impl BlockCode {
    /// Get the introducer byte
    pub fn signature(self) -> u8 {
        use self::BlockCode::*;
        match self {
            ImageDesc_ => b',', // (0x2C) Image separator
            Extension_ => b'!', // (0x21) Extension introducer
            Trailer_ => b';',   // (0x3B) GIF trailer
        }
    }
}

/// Extension labels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    GraphicControl_,
    Application_,
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            GraphicControl_ => 0xF9,
            Application_ => 0xFF,
        }
    }
}

/// File signature and version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    version: [u8; 3],
}

impl Default for Header {
    fn default() -> Self {
        Header::with_version(*b"89a")
    }
}

impl Header {
    /// Create a header with a version
    pub fn with_version(version: [u8; 3]) -> Self {
        Header { version }
    }

    /// Get the version
    pub fn version(&self) -> [u8; 3] {
        self.version
    }
}

/// Logical screen descriptor
///
/// No global color table is ever written, so the packed fields are all zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    background_color_idx: u8,
    pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }

    /// Get the packed flags
    pub fn flags(&self) -> Result<u8> {
        pack_byte(&[
            (0, 1), // global color table present
            (0, 3), // color resolution
            (0, 1), // sort
            (0, 3), // global color table size
        ])
    }
}

/// Application extension
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Application {
    app_data: Vec<Vec<u8>>, // sequence of sub-blocks
}

impl Application {
    /// Create a looping (NETSCAPE2.0) extension.
    ///
    /// A loop count of zero means loop forever.
    pub fn with_loop_count(loop_count: u16) -> Self {
        let mut v = vec![1];
        v.extend_from_slice(&loop_count.to_le_bytes());
        let app_data = vec![b"NETSCAPE2.0".to_vec(), v];
        Application { app_data }
    }

    /// Get the application data sub-blocks
    pub fn app_data(&self) -> &[Vec<u8>] {
        &self.app_data
    }

    /// Get the loop count, if this is a looping extension
    pub fn loop_count(&self) -> Option<u16> {
        match &self.app_data[..] {
            [id, data]
                if id[..] == b"NETSCAPE2.0"[..]
                    && data.len() == 3
                    && data[0] == 1 =>
            {
                Some(u16::from_le_bytes([data[1], data[2]]))
            }
            _ => None,
        }
    }
}

/// Graphic control extension
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraphicControl {
    disposal_method: DisposalMethod,
    user_input: bool,
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
}

impl GraphicControl {
    pub fn with_disposal_method(mut self, disposal: DisposalMethod) -> Self {
        self.disposal_method = disposal;
        self
    }
    pub fn disposal_method(&self) -> DisposalMethod {
        self.disposal_method
    }
    pub fn with_delay_time_cs(mut self, delay_time_cs: u16) -> Self {
        self.delay_time_cs = delay_time_cs;
        self
    }
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
    pub fn user_input(&self) -> bool {
        self.user_input
    }

    /// Get the packed flags
    pub fn flags(&self) -> Result<u8> {
        pack_byte(&[
            (0, 3), // reserved
            (u32::from(u8::from(self.disposal_method)), 3),
            (u32::from(self.user_input), 1),
            (0, 1), // transparent color flag
        ])
    }

    /// Get the transparent color index (always unused)
    pub fn transparent_color_idx(&self) -> u8 {
        0
    }
}

/// Image descriptor
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    color_table_present: bool,
    color_table_len_bits: u8,
}

impl ImageDesc {
    pub fn left(&self) -> u16 {
        self.left
    }
    pub fn top(&self) -> u16 {
        self.top
    }
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }
    pub fn width(&self) -> u16 {
        self.width
    }
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Set the local color table configuration
    pub fn with_color_table(mut self, tbl: &ColorTable) -> Self {
        self.color_table_present = !tbl.is_empty();
        self.color_table_len_bits = tbl.len_bits();
        self
    }

    /// Get the packed flags
    pub fn flags(&self) -> Result<u8> {
        pack_byte(&[
            (u32::from(self.color_table_present), 1),
            (0, 1), // interlaced
            (0, 1), // sort
            (0, 2), // reserved
            (u32::from(self.color_table_len_bits), 3),
        ])
    }
}

/// Compressed image data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    min_code_size: u8,
    data: Vec<u8>, // packed LZW codes, not yet split into sub-blocks
}

impl ImageData {
    /// Create image data from packed LZW codes
    pub fn new(min_code_size: u8, data: Vec<u8>) -> Self {
        ImageData {
            min_code_size,
            data,
        }
    }
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// File trailer
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trailer {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::palette::Palette;
    use pix::rgb::SRgb8;

    #[test]
    fn disposal() {
        for n in 0..=7 {
            let d = DisposalMethod::try_from(n).unwrap();
            assert_eq!(u8::from(d), n);
        }
        assert_eq!(DisposalMethod::try_from(2u8).unwrap(), DisposalMethod::Background);
        assert!(DisposalMethod::try_from(8u8).is_err());
    }

    #[test]
    fn loop_count() {
        let b = Application::default();
        assert_eq!(b.loop_count(), None);
        let b = Application::with_loop_count(0);
        assert_eq!(b.loop_count(), Some(0));
        let b = Application::with_loop_count(0x0102);
        assert_eq!(b.app_data()[1], [1, 0x02, 0x01]);
        assert_eq!(b.loop_count(), Some(0x0102));
    }

    #[test]
    fn graphic_control_flags() {
        let gc = GraphicControl::default();
        assert!(!gc.user_input());
        assert_eq!(gc.transparent_color_idx(), 0);
        assert_eq!(gc.flags().unwrap(), 0);
        let gc = gc.with_disposal_method(DisposalMethod::Keep);
        assert_eq!(gc.flags().unwrap(), 0b0000_0100);
        let gc = gc.with_disposal_method(DisposalMethod::Reserved(7));
        assert_eq!(gc.flags().unwrap(), 0b0001_1100);
    }

    #[test]
    fn image_desc_flags() {
        let pal = Palette::with_colors(&[SRgb8::new(1, 2, 3); 5]);
        let tbl = ColorTable::new(&pal).unwrap();
        let desc = ImageDesc::default().with_color_table(&tbl);
        assert_eq!(desc.flags().unwrap(), 0b1000_0010);
        let tbl = ColorTable::new(&Palette::default()).unwrap();
        let desc = ImageDesc::default().with_color_table(&tbl);
        assert_eq!(desc.flags().unwrap(), 0);
        assert_eq!(LogicalScreenDesc::default().flags().unwrap(), 0);
    }
}
