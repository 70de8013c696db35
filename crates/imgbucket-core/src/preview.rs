/// Shrinks `(native_width, native_height)` to fit inside the bounding box while
/// keeping the aspect ratio. Never upscales.
///
/// A single dominant-axis ratio is applied to both sides, so the result always
/// fits and the proportions stay intact. Sides are floored but kept at least 1
/// pixel for extreme aspect ratios.
pub fn scale_to_fit(
    native_width: u32,
    native_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if native_width == 0 || native_height == 0 {
        return (native_width, native_height);
    }
    if max_width == 0 || max_height == 0 {
        return (0, 0);
    }

    let ratio = f64::max(
        f64::from(native_width) / f64::from(max_width),
        f64::from(native_height) / f64::from(max_height),
    );
    if ratio <= 1.0 {
        return (native_width, native_height);
    }

    let factor = 1.0 / ratio;
    (
        scaled_side(native_width, factor),
        scaled_side(native_height, factor),
    )
}

fn scaled_side(side: u32, factor: f64) -> u32 {
    let scaled = (f64::from(side) * factor).floor();
    (scaled as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::scale_to_fit;

    #[test]
    fn wide_image_is_scaled_by_dominant_ratio() {
        assert_eq!(scale_to_fit(3000, 1000, 1850, 900), (1849, 616));
    }

    #[test]
    fn small_image_is_returned_unchanged() {
        assert_eq!(scale_to_fit(800, 600, 1850, 900), (800, 600));
    }

    #[test]
    fn exact_fit_is_not_resized() {
        assert_eq!(scale_to_fit(1850, 900, 1850, 900), (1850, 900));
    }

    #[test]
    fn tall_image_is_bounded_by_height() {
        let (width, height) = scale_to_fit(1000, 3600, 1850, 900);
        assert_eq!(height, 900);
        assert_eq!(width, 250);
    }

    #[test]
    fn result_always_fits_bounding_box() {
        let samples = [
            (4000, 3000),
            (1851, 901),
            (123, 4567),
            (9999, 10),
            (1, 1),
            (1850, 901),
        ];
        for (width, height) in samples {
            let (scaled_width, scaled_height) = scale_to_fit(width, height, 1850, 900);
            assert!(scaled_width <= 1850, "{width}x{height} -> {scaled_width}");
            assert!(scaled_height <= 900, "{width}x{height} -> {scaled_height}");
            assert!(scaled_width >= 1 && scaled_height >= 1);
        }
    }

    #[test]
    fn extreme_aspect_ratio_keeps_one_pixel() {
        assert_eq!(scale_to_fit(100_000, 10, 100, 100), (100, 1));
    }

    #[test]
    fn empty_bounding_box_yields_zero() {
        assert_eq!(scale_to_fit(640, 480, 0, 20), (0, 0));
    }
}
