use proptest::prelude::*;
use shadow_gauge::core_modules::histogram::Histogram;
use shadow_gauge::{BoundingBox, Frame, FrameError, Pixel, Segmenter};

#[test]
fn all_white_frame_has_no_shadow() {
    let frame = Frame::filled(32, 24, Pixel::WHITE).unwrap();
    let (summary, _) = Segmenter::default().summarize(&frame);
    assert_eq!(summary.pixel_count, 0);
    assert_eq!(summary.bounding_box, BoundingBox::default());
    assert_eq!(summary.average_intensity, 0.0);
}

#[test]
fn all_black_frame_is_all_shadow() {
    let frame = Frame::filled(32, 24, Pixel::BLACK).unwrap();
    let (summary, _) = Segmenter::default().summarize(&frame);
    assert_eq!(summary.pixel_count, 32 * 24);
    assert_eq!(summary.bounding_box, BoundingBox::new(0, 0, 31, 23));
    assert_eq!(summary.average_intensity, 0.0);
}

#[test]
fn black_block_in_four_by_four_frame() {
    let frame = Frame::from_fn(4, 4, |x, y| {
        if (1..=2).contains(&x) && (1..=2).contains(&y) {
            Pixel::BLACK
        } else {
            Pixel::WHITE
        }
    })
    .unwrap();
    let segmentation = Segmenter::default().segment(&frame);
    assert_eq!(segmentation.summary.pixel_count, 4);
    assert_eq!(segmentation.summary.bounding_box, BoundingBox::new(1, 1, 2, 2));
    assert_eq!(segmentation.summary.average_intensity, 0.0);
    assert_eq!(segmentation.mask.get_pixel(1, 1).0, [0, 0, 0, 255]);
    assert_eq!(segmentation.mask.get_pixel(3, 3).0, [255, 255, 255, 255]);
}

#[test]
fn bimodal_otsu_lands_between_modes() {
    let mut gray = vec![20u8; 1000];
    gray.extend(std::iter::repeat_n(200u8, 1000));
    let threshold = Histogram::from_gray(&gray).otsu_threshold();
    assert!(threshold > 20 && threshold <= 200);
}

#[test]
fn segmenting_twice_is_identical() {
    let frame = Frame::from_fn(64, 48, |x, y| {
        let level = ((x * 7 + y * 13) % 256) as u8;
        Pixel::new(level, level / 2, level / 3)
    })
    .unwrap();
    let segmenter = Segmenter::default();
    let first = segmenter.segment(&frame);
    let second = segmenter.segment(&frame);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.threshold, second.threshold);
    assert_eq!(first.mask, second.mask);
}

#[test]
fn shadow_next_to_dark_red_object_is_isolated() {
    // Bright background, a neutral shadow on the left and a deep red mug on
    // the right that is just as dark in luma.
    let frame = Frame::from_fn(60, 20, |x, _| match x {
        5..=19 => Pixel::new(40, 40, 42),
        40..=54 => Pixel::new(130, 5, 5),
        _ => Pixel::new(220, 220, 215),
    })
    .unwrap();
    let (summary, threshold) = Segmenter::default().summarize(&frame);
    assert!(threshold.applied > 42);
    assert_eq!(summary.pixel_count, 15 * 20);
    assert_eq!(summary.bounding_box, BoundingBox::new(5, 0, 19, 19));
}

#[test]
fn malformed_buffers_fail_fast() {
    assert!(matches!(
        Frame::new(0, 0, Vec::new()),
        Err(FrameError::EmptyFrame { .. })
    ));
    assert!(matches!(
        Frame::new(4, 4, vec![0; 47]),
        Err(FrameError::BufferLength { .. })
    ));
    assert!(matches!(
        Frame::from_rgba(4, 4, &[0; 48]),
        Err(FrameError::BufferLength { .. })
    ));
}

proptest! {
    #[test]
    fn summary_stays_inside_the_frame(
        width in 1u32..24,
        height in 1u32..24,
        seed in prop::collection::vec(any::<u8>(), 3..96),
    ) {
        let frame = Frame::from_fn(width, height, |x, y| {
            let i = ((y * width + x) as usize * 3) % seed.len();
            Pixel::new(
                seed[i],
                seed[(i + 1) % seed.len()],
                seed[(i + 2) % seed.len()],
            )
        })
        .unwrap();
        let (summary, threshold) = Segmenter::default().summarize(&frame);

        prop_assert!(summary.pixel_count <= (width * height) as u64);
        prop_assert!((30..=80).contains(&threshold.applied));
        prop_assert!(summary.average_intensity >= 0.0);
        prop_assert!(summary.average_intensity < threshold.applied as f64);
        if summary.pixel_count > 0 {
            let bbox = summary.bounding_box;
            prop_assert!(bbox.min_x <= bbox.max_x && bbox.max_x < width);
            prop_assert!(bbox.min_y <= bbox.max_y && bbox.max_y < height);
        } else {
            prop_assert_eq!(summary.bounding_box, BoundingBox::default());
            prop_assert_eq!(summary.average_intensity, 0.0);
        }
    }
}
