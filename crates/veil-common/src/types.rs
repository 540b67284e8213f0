mod color;
mod geometry;

pub use color::*;
pub use geometry::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_fits_within() {
        let fb = Size2D::new(64, 64);
        assert!(Size2D::new(64, 64).fits_within(fb));
        assert!(Size2D::new(32, 64).fits_within(fb));
        assert!(!Size2D::new(65, 64).fits_within(fb));
        assert!(!Size2D::new(64, 128).fits_within(fb));
    }

    #[test]
    fn size_is_empty() {
        assert!(Size2D::new(0, 10).is_empty());
        assert!(Size2D::new(10, 0).is_empty());
        assert!(!Size2D::new(1, 1).is_empty());
    }

    #[test]
    fn mip_size_halves_and_clamps() {
        let s = Size2D::new(64, 16);
        assert_eq!(s.mip(0), Size2D::new(64, 16));
        assert_eq!(s.mip(1), Size2D::new(32, 8));
        assert_eq!(s.mip(5), Size2D::new(2, 1));
        assert_eq!(s.mip(9), Size2D::new(1, 1));
    }

    #[test]
    fn full_mip_chain_length() {
        assert_eq!(Size2D::new(1, 1).full_mip_chain(), 1);
        assert_eq!(Size2D::new(64, 64).full_mip_chain(), 7);
        assert_eq!(Size2D::new(1280, 720).full_mip_chain(), 11);
    }

    #[test]
    fn rect_from_size_starts_at_origin() {
        let r = Rect2D::from_size(Size2D::new(640, 480));
        assert_eq!(r, Rect2D::new(0, 0, 640, 480));
        assert_eq!(r.max_x(), 640);
        assert_eq!(r.max_y(), 480);
    }

    #[test]
    fn size_serialization() {
        let s = Size2D::new(1920, 1080);
        let json = serde_json::to_string(&s).unwrap();
        let deserialized: Size2D = serde_json::from_str(&json).unwrap();
        assert_eq!(s, deserialized);
    }

    #[test]
    fn color_from_hex_6() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 255));
    }

    #[test]
    fn color_from_hex_8() {
        let c = Color::from_hex("ff880080").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 128));
    }

    #[test]
    fn color_from_hex_invalid() {
        assert!(Color::from_hex("zzzzzz").is_none());
        assert!(Color::from_hex("#abc").is_none());
        assert!(Color::from_hex("").is_none());
    }

    #[test]
    fn color_to_f32_normalizes() {
        let c = Color::from_rgba(255, 0, 51, 255);
        let [r, g, b, a] = c.to_f32();
        assert!((r - 1.0).abs() < f32::EPSILON);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-6);
        assert!((a - 1.0).abs() < f32::EPSILON);
    }
}
