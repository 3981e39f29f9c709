//! Fixed color palettes for stars, clouds and shooting stars.

use glam::Vec3;
use rand::Rng;

/// Convert a `0xRRGGBB` literal to an RGB vector in [0, 1].
pub const fn hex_color(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Star colors from cool blue-white to warm orange.
pub const STAR_COLORS: [Vec3; 5] = [
    Vec3::new(0.61, 0.77, 1.0),
    Vec3::new(0.85, 0.91, 1.0),
    Vec3::new(1.0, 0.98, 0.86),
    Vec3::new(1.0, 0.91, 0.72),
    Vec3::new(1.0, 0.76, 0.53),
];

/// Index into [`STAR_COLORS`] for a uniform roll `u` in [0, 1).
///
/// Squaring the roll biases selection toward the cool end of the palette.
pub fn star_color_index(u: f32) -> usize {
    ((u * u * STAR_COLORS.len() as f32) as usize).min(STAR_COLORS.len() - 1)
}

pub const DEEP_PURPLE: Vec3 = hex_color(0x1a0a2e);
pub const DARK_VIOLET: Vec3 = hex_color(0x2d1b4e);
pub const RICH_PURPLE: Vec3 = hex_color(0x3d2c5e);
pub const DEEP_BLUE: Vec3 = hex_color(0x1a3d5a);
pub const TEAL_BLUE: Vec3 = hex_color(0x1a4d5a);
pub const DARK_TEAL: Vec3 = hex_color(0x0f3d4a);
pub const BLUE_GREEN: Vec3 = hex_color(0x0d4d4a);
pub const DARK_CYAN: Vec3 = hex_color(0x0a3d3d);

/// The eight dark nebula hues present in every palette.
pub const NEBULA_BASE: [Vec3; 8] = [
    DEEP_PURPLE,
    DARK_VIOLET,
    RICH_PURPLE,
    DEEP_BLUE,
    TEAL_BLUE,
    DARK_TEAL,
    BLUE_GREEN,
    DARK_CYAN,
];

/// Pink, yellow and navy accents carried by the extended palette.
pub const NEBULA_ACCENTS: [Vec3; 9] = [
    hex_color(0xff69b4),
    hex_color(0xffb3d9),
    hex_color(0xff85c1),
    hex_color(0xff4d9e),
    hex_color(0xffc0e0),
    hex_color(0xffd700),
    hex_color(0xffed4e),
    hex_color(0x001f3f),
    hex_color(0x0a1628),
];

/// Colors clouds and shooting stars draw from, uniformly.
#[derive(Debug, Clone, PartialEq)]
pub struct NebulaPalette {
    colors: Vec<Vec3>,
}

impl NebulaPalette {
    pub fn new(extended: bool) -> Self {
        let mut colors = NEBULA_BASE.to_vec();
        if extended {
            colors.extend_from_slice(&NEBULA_ACCENTS);
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        self.colors[rng.random_range(0..self.colors.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hex_color_channels() {
        let c = hex_color(0xff8000);
        assert_eq!(c.x, 1.0);
        assert!((c.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn test_star_color_index_bias() {
        assert_eq!(star_color_index(0.0), 0);
        // sqrt(0.2) ~ 0.447: below it lands on the first entry.
        assert_eq!(star_color_index(0.44), 0);
        assert_eq!(star_color_index(0.46), 1);
        assert_eq!(star_color_index(0.999_999), 4);
        assert_eq!(star_color_index(1.0), 4);
    }

    #[test]
    fn test_palette_sizes() {
        assert_eq!(NebulaPalette::new(false).colors().len(), 8);
        assert_eq!(NebulaPalette::new(true).colors().len(), 17);
    }

    #[test]
    fn test_pick_stays_in_palette() {
        let palette = NebulaPalette::new(false);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let c = palette.pick(&mut rng);
            assert!(palette.colors().contains(&c));
        }
    }

    #[test]
    fn test_extended_pick_reaches_accents() {
        let palette = NebulaPalette::new(true);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let hit_accent = (0..500).any(|_| NEBULA_ACCENTS.contains(&palette.pick(&mut rng)));
        assert!(hit_accent, "accent colors never drawn from extended palette");
    }
}
