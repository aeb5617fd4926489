use armor_detector::Frame;

/// A bright bluish vertical bar to paint into a synthetic frame.
pub struct Bar {
    /// Left edge, pixels.
    pub x: usize,
    /// Top edge, pixels.
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Generates a dark frame with bright bluish bars painted in.
pub fn frame_with_bars(width: usize, height: usize, bars: &[Bar]) -> Frame {
    assert!(width > 0 && height > 0, "frame dimensions must be positive");
    let mut rgb = vec![0u8; width * height * 3];
    for bar in bars {
        for y in bar.y..(bar.y + bar.height).min(height) {
            for x in bar.x..(bar.x + bar.width).min(width) {
                let i = (y * width + x) * 3;
                rgb[i] = 40;
                rgb[i + 1] = 60;
                rgb[i + 2] = 250;
            }
        }
    }
    Frame::from_rgb8(width, height, rgb).expect("valid synthetic frame")
}

/// Generates a dark frame with a bright bar tilted by roughly 45 degrees.
pub fn frame_with_diagonal_bar(width: usize, height: usize, x0: usize, y0: usize, len: usize) -> Frame {
    let mut rgb = vec![0u8; width * height * 3];
    for t in 0..len {
        let x = x0 + t;
        let y = y0 + t;
        if x + 2 >= width || y >= height {
            break;
        }
        for dx in 0..3 {
            let i = (y * width + x + dx) * 3;
            rgb[i] = 40;
            rgb[i + 1] = 60;
            rgb[i + 2] = 250;
        }
    }
    Frame::from_rgb8(width, height, rgb).expect("valid synthetic frame")
}
