//! Fixed color palettes, stored as sRGB hex and converted to linear RGB
//! for lighting math.

use glam::Vec3;

/// Scene background and fog color.
pub const BACKGROUND: u32 = 0x000000;

/// Warm off-white used by the leading lights and spheres.
pub const LIGHT: u32 = 0xffe0b3;

/// Ring colors, applied round-robin along the loop.
pub const RINGS: [u32; 12] = [
    0x3ee0db, 0x20a1bf, 0x04358d, 0x250a57, 0x5e49b4, 0xc36cc9, 0xf78a90, 0xffae36, 0xffdb7f,
    0xfff9e5, 0xd6ef10, 0x69c32c,
];

/// Tube colors, picked at random per tube.
pub const TUBES: [u32; 6] = [0x19011a, 0x5c4cbf, 0x4f67ff, 0xffebd8, 0xffb366, 0xff7f00];

fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Expands a `0xRRGGBB` sRGB color into linear RGB.
pub fn linear_rgb(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(
        srgb_channel_to_linear(r),
        srgb_channel_to_linear(g),
        srgb_channel_to_linear(b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_and_white_endpoints() {
        assert_eq!(linear_rgb(0x000000), Vec3::ZERO);
        let white = linear_rgb(0xffffff);
        assert!((white - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn test_midtone_is_darker_in_linear() {
        // sRGB 0.5 decodes to roughly 0.214 linear.
        let gray = linear_rgb(0x808080);
        assert!((gray.x - 0.2159).abs() < 1e-3);
        assert_eq!(gray.x, gray.y);
        assert_eq!(gray.y, gray.z);
    }

    #[test]
    fn test_channels_are_independent() {
        let red = linear_rgb(0xff0000);
        assert_eq!(red.y, 0.0);
        assert_eq!(red.z, 0.0);
        assert!((red.x - 1.0).abs() < 1e-6);
    }
}
