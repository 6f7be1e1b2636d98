// cargo fuzz run encode corpus/encode -- -timeout=30

#![no_main]

use libfuzzer_sys::fuzz_target;

use animgif::{encode_animation, Frame};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let width = u32::from(data[0] & 0x3F);
    let height = u32::from(data[1] & 0x3F);
    let channels = if data[2] & 1 == 0 { 3 } else { 4 };
    let disposal = data[3] & 0x07;
    let len = (width * height) as usize * channels;
    let pixels = &data[4..];
    if pixels.len() < len {
        return;
    }
    let frames: Vec<Frame> = pixels
        .chunks_exact(len.max(1))
        .take(4)
        .filter_map(|buf| {
            let buf = if len == 0 { &buf[..0] } else { buf };
            Frame::from_buffer(width, height, channels, buf, 1, disposal).ok()
        })
        .collect();
    if let Ok(gif) = encode_animation(&frames, 0, Some(width), Some(height)) {
        assert_eq!(&gif[..6], b"GIF89a");
        assert_eq!(gif.last(), Some(&0x3B));
    }
});
