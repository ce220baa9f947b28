//! Integration tests for rastr crates.
//!
//! End-to-end tests that run file formats, curves, filters, resampling and
//! the compositor together.

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use rastr_core::pixel::{gb7_luma, gb7_mask};
    use rastr_core::{BlendMode, LayerData, LayerImage, LayerStack, NormalizeOptions, Rgb8, StackConfig, to_rgba};

    fn gradient_layer(w: u32, h: u32) -> LayerImage {
        let rgba: Vec<u8> = (0..h)
            .flat_map(|y| {
                (0..w).flat_map(move |x| {
                    let v = ((x + y) * 255 / (w + h - 2).max(1)) as u8;
                    [v, v, v, if x == 0 { 0 } else { 255 }]
                })
            })
            .collect();
        LayerImage::raster(w, h, rgba).unwrap()
    }

    /// GB7 bytes from the format description round trip through a file.
    #[test]
    fn test_gb7_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.gb7");
        let mut bytes = vec![0x47, 0x42, 0x37, 0x1D, 0x01, 0x01, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00];
        bytes.extend_from_slice(&[0x00, 0x7F, 0x80, 0xFF]);
        std::fs::write(&path, &bytes).unwrap();

        let layer = rastr_io::read(&path).expect("Failed to read GB7");
        assert_eq!(layer.dimensions(), (2, 2));

        let rgba = to_rgba(&layer, NormalizeOptions::default());
        assert_eq!(rgba.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(rgba.pixel(1, 0), Some([255, 255, 255, 0]));
        assert_eq!(rgba.pixel(0, 1), Some([0, 0, 0, 255]));
        assert_eq!(rgba.pixel(1, 1), Some([255, 255, 255, 255]));

        let out = dir.path().join("copy.gb7");
        rastr_io::write(&out, &layer, &rastr_io::WriteOptions::default()).expect("Failed to write GB7");
        assert_eq!(std::fs::read(&out).unwrap(), bytes);
    }

    /// PNG -> GB7 -> PNG keeps dimensions and the 1-bit alpha.
    #[test]
    fn test_png_gb7_png() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("in.png");
        let gb7 = dir.path().join("mid.gb7");
        let back = dir.path().join("out.png");

        let src = gradient_layer(16, 8);
        rastr_io::write(&png, &src, &rastr_io::WriteOptions::default()).unwrap();
        let loaded = rastr_io::read(&png).unwrap();
        assert_eq!(loaded.data(), src.data());

        rastr_io::write(&gb7, &loaded, &rastr_io::WriteOptions::default()).unwrap();
        let mid = rastr_io::read(&gb7).unwrap();
        assert!(mid.has_alpha());
        assert_eq!(mid.transparent_pixel_count(), 8);

        rastr_io::write(&back, &mid, &rastr_io::WriteOptions::default()).unwrap();
        let out = rastr_io::read(&back).unwrap();
        assert_eq!(out.dimensions(), (16, 8));
        let rgba = to_rgba(&out, NormalizeOptions::default());
        for (a, b) in rgba.as_bytes().chunks_exact(4).zip(src_rgba(&src).chunks_exact(4)) {
            assert_eq!(a[3], b[3]);
            // 7-bit quantization
            assert!((a[0] as i32 - b[0] as i32).abs() <= 2);
        }
    }

    fn src_rgba(layer: &LayerImage) -> Vec<u8> {
        to_rgba(layer, NormalizeOptions::default()).into_raw()
    }

    #[test]
    fn test_curves_pipeline() {
        use rastr_lut::{AlphaMode, ChannelLuts, GB7_MAX, HistogramOptions, apply_curves, apply_curves_gb7, build_lut, calc_histogram};

        let layer = gradient_layer(32, 32);
        let rgba = to_rgba(&layer, NormalizeOptions::default());

        // identity curves are a no-op
        let identity = ChannelLuts::rgb(build_lut(0.0, 0.0, 255.0, 255.0, 255));
        assert_eq!(apply_curves(&rgba, &identity), rgba);

        // inverting curve mirrors the histogram
        let invert = ChannelLuts::rgb(build_lut(0.0, 255.0, 255.0, 0.0, 255));
        let inverted = apply_curves(&rgba, &invert);
        let h0 = calc_histogram(&rgba, HistogramOptions::default());
        let h1 = calc_histogram(&inverted, HistogramOptions::default());
        let (r0, r1) = (h0.channels()[0].1.to_vec(), h1.channels()[0].1.to_vec());
        for v in 0..256 {
            assert_eq!(r0[v], r1[255 - v]);
        }
        assert_eq!(r1.iter().sum::<u32>(), 32 * 32);

        // GB7 threshold mask
        let packed: Vec<u8> = (0..=127u8).map(|y| 0x80 | y).collect();
        let out = apply_curves_gb7(&packed, Some(&build_lut(0.0, 0.0, 127.0, 127.0, GB7_MAX)), AlphaMode::threshold(64));
        assert!(out.iter().all(|&b| gb7_mask(b) == (gb7_luma(b) >= 64)));
    }

    /// Clearing the mask of an unmasked GB7 image survives a save.
    #[test]
    fn test_gb7_mask_edit_on_unmasked_image() {
        use rastr_io::gb7::{self, EncodeOptions};
        use rastr_lut::{AlphaMode, apply_curves_gb7};

        let plain = LayerImage::gb7(2, 1, vec![0x80, 0xFF], false).unwrap();
        let mode = AlphaMode::Transparent;
        let edited = plain.with_gb7_mask(apply_curves_gb7(&[0x80, 0xFF], None, mode)).unwrap();
        assert!(edited.has_alpha());

        let bytes = gb7::encode(&edited, EncodeOptions::default()).unwrap();
        assert_eq!(bytes[5] & 1, 1);
        assert_eq!(&bytes[12..], &[0x00, 0x7F]);

        let back = gb7::decode(&bytes).unwrap();
        assert!(back.has_alpha());
        assert_eq!(back.transparent_pixel_count(), 2);
        let rgba = to_rgba(&back, NormalizeOptions::default());
        assert!(rgba.as_bytes().chunks_exact(4).all(|px| px[3] == 0));
    }

    #[test]
    fn test_filter_and_resize_pipeline() {
        use rastr_ops::filter::{Kernel3x3, KernelPreset, convolve_rgb_3x3};
        use rastr_ops::resize::{Interpolation, bilinear, nearest_neighbor, resize_layer};

        let layer = gradient_layer(20, 10);
        let rgba = to_rgba(&layer, NormalizeOptions::default());

        assert_eq!(convolve_rgb_3x3(&rgba, &Kernel3x3::identity()), rgba);
        let blurred = convolve_rgb_3x3(&rgba, &KernelPreset::Gaussian.kernel());
        // alpha untouched by RGB filters
        for (a, b) in blurred.as_bytes().chunks_exact(4).zip(rgba.as_bytes().chunks_exact(4)) {
            assert_eq!(a[3], b[3]);
        }

        let up = nearest_neighbor(&rgba, 40, 20).unwrap();
        let down = nearest_neighbor(&up, 20, 10).unwrap();
        assert_eq!(down, rgba);

        let same = bilinear(&rgba, 20, 10).unwrap();
        assert_eq!(same.dimensions(), (20, 10));

        let resized = resize_layer(&layer.with_blend_mode(BlendMode::Screen), 5, 5, Interpolation::Bilinear).unwrap();
        assert_eq!(resized.dimensions(), (5, 5));
        assert_eq!(resized.blend_mode(), BlendMode::Screen);
    }

    #[test]
    fn test_render_stack_pipeline() {
        use rastr_ops::render::{RenderOptions, render};
        use rastr_ops::resize::Interpolation;

        let mut stack = LayerStack::new(StackConfig::default());
        let base = LayerImage::flat(10, 10, Rgb8::new(200, 200, 200)).unwrap();
        let top = LayerImage::gb7(4, 4, vec![0x80; 16], true)
            .unwrap()
            .with_blend_mode(BlendMode::Multiply);
        stack.push(base).unwrap();
        stack.push(top).unwrap();
        assert!(stack.push(LayerImage::flat(1, 1, Rgb8::BLACK).unwrap()).is_err());

        let opts = RenderOptions {
            content_scale: 1.0,
            base_scale: 1.0,
            interpolation: Interpolation::Nearest,
        };
        let out = render(stack.layers(), &opts).unwrap().unwrap();
        assert_eq!((out.width(), out.height()), (10, 10));
        // black multiplied into the centered 4x4
        assert_eq!(out.pick(3, 3), Some([0, 0, 0, 255]));
        assert_eq!(out.pick(6, 6), Some([0, 0, 0, 255]));
        assert_eq!(out.pick(2, 2), Some([200, 200, 200, 255]));
        assert_eq!(out.pick(7, 7), Some([200, 200, 200, 255]));

        // moving the small layer to the bottom changes the canvas size
        stack.move_up(1).unwrap();
        let out = render(stack.layers(), &opts).unwrap().unwrap();
        assert_eq!((out.width(), out.height()), (4, 4));
        assert_eq!(out.pick(0, 0), Some([200, 200, 200, 255]));

        // rendered output saves as a regular raster layer
        let dir = tempdir().unwrap();
        let path = dir.path().join("render.png");
        let layer = out.canvas.into_layer().unwrap();
        rastr_io::write(&path, &layer, &rastr_io::WriteOptions::default()).unwrap();
        assert!(matches!(rastr_io::read(&path).unwrap().data(), LayerData::Raster { .. }));
    }

    #[test]
    fn test_eyedropper_color_info() {
        use approx::assert_abs_diff_eq;
        use rastr_ops::render::{RenderOptions, render};

        let layers = [LayerImage::flat(3, 3, Rgb8::WHITE).unwrap()];
        let out = render(&layers, &RenderOptions::default()).unwrap().unwrap();
        let info = out.pick_info(1, 1).unwrap();
        assert_abs_diff_eq!(info.lab.l, 100.0, epsilon = 0.05);
        assert_abs_diff_eq!(info.lab.a, 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(info.lab.b, 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(info.xyz.y, 100.0, epsilon = 0.05);
        assert_eq!(rastr_core::contrast_ratio(Rgb8::WHITE, Rgb8::BLACK), 21.0);
    }

    #[test]
    fn test_remove_alpha_then_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("opaque.gb7");
        let layer = gradient_layer(6, 6).remove_alpha();
        assert!(!layer.has_alpha());

        rastr_io::write(&path, &layer, &rastr_io::WriteOptions::default()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes[5] & 1, 0);
        assert!(bytes[12..].iter().all(|&b| gb7_mask(b)));
    }
}
