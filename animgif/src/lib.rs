// lib.rs      animgif crate.
//
// Copyright (c) 2026  Douglas Lau
//
//! Encoder for animated GIF images.
//!
//! Each [Frame] is indexed into its own local color table, compressed with
//! LZW and assembled with its delay and disposal method into a GIF89a file.
//!
//! ## Example
//! ```
//! use animgif::Frame;
//! use pix::{rgb::SRgb8, Raster};
//!
//! # fn main() -> Result<(), animgif::Error> {
//! let raster = Raster::with_pixels(2, 1, vec![
//!     SRgb8::new(0xFF, 0x80, 0),
//!     SRgb8::new(0, 0x80, 0xFF),
//! ]);
//! let frames = [Frame::with_rgb(&raster, 100, 0)?];
//! let gif = animgif::encode_animation(&frames, 0, Some(2), Some(1))?;
//! assert_eq!(gif.last(), Some(&0x3B));
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod bits;
pub mod block;
mod encode;
mod error;
pub mod lzw;
pub mod palette;
mod private;

pub use crate::bits::{le_bytes, pack_bits};
pub use crate::encode::{assemble, chunkify, encode_frame};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::private::{
    encode_animation, encode_frames, Animation, Frame, FrameBytes,
};
