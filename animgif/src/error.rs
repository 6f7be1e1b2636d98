// error.rs
//
// Copyright (c) 2026  Douglas Lau
//
use std::fmt;
use std::num::TryFromIntError;

/// Errors encountered while encoding
#[derive(Debug)]
pub enum Error {
    /// Integer out of bounds.
    TryFromInt(TryFromIntError),
    /// Frame delay not in `0..65536` centiseconds.
    InvalidDelay(u32),
    /// Disposal method not in `0..=7`.
    InvalidDisposal(u8),
    /// Repeat count not in `0..=65535`.
    InvalidRepeatCount(u32),
    /// Screen or frame dimensions larger than 65535.
    InvalidDimensions(u32, u32),
    /// Pixel buffer length does not match its dimensions.
    InvalidBufferSize,
    /// Pixel buffer must have 3 or 4 channels.
    InvalidChannels(usize),
    /// Value does not fit in a packed bit field.
    FieldOverflow {
        /// Value to pack
        value: u32,
        /// Width of the field, in bits
        bits: u8,
    },
    /// Value does not fit in the requested number of bytes.
    ByteOverflow {
        /// Value to convert
        value: u32,
        /// Number of bytes
        n_bytes: usize,
    },
    /// More than 256 distinct colors in one frame.
    TooManyColors,
    /// LZW minimum code size not in `2..=8`.
    InvalidCodeSize(u8),
    /// Color index outside of the LZW alphabet.
    InvalidColorIndex(u8),
}

/// Classification of an [Error]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied an out-of-range value
    Validation,
    /// A frame has too many colors for a GIF color table
    Capacity,
    /// Internal invariant violated while encoding
    Encoding,
}

/// Animgif result type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            InvalidDelay(_)
            | InvalidDisposal(_)
            | InvalidRepeatCount(_)
            | InvalidDimensions(_, _)
            | InvalidBufferSize
            | InvalidChannels(_)
            | FieldOverflow { .. }
            | ByteOverflow { .. } => ErrorKind::Validation,
            TooManyColors => ErrorKind::Capacity,
            TryFromInt(_) | InvalidCodeSize(_) | InvalidColorIndex(_) => {
                ErrorKind::Encoding
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TryFromInt(err) => err.fmt(fmt),
            Error::InvalidDelay(d) => write!(fmt, "invalid delay: {}", d),
            Error::InvalidDisposal(d) => {
                write!(fmt, "invalid disposal method: {}", d)
            }
            Error::InvalidRepeatCount(r) => {
                write!(fmt, "invalid repeat count: {}", r)
            }
            Error::InvalidDimensions(w, h) => {
                write!(fmt, "invalid dimensions: {}x{}", w, h)
            }
            Error::TooManyColors => write!(fmt, "too many colors in frame"),
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::TryFromInt(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::TryFromInt(err)
    }
}
