use advision::banner::{rectify_batch, rectify_observation, LinkTable, RectangleObservation};
use advision::core::{
    overlay_pose, place_anchor, Image, NormalizedPoint, NormalizedRect, Orientation, Pose,
    RectifyError, RectifyParams, Size,
};
use advision::frame::{load_frame, save_image};
use advision::{BannerPipeline, Classification, DetectionOutcome, PipelineParams};
use approx::assert_relative_eq;

fn hd_frame() -> Image {
    let mut img = Image::new(1920, 1080, 3);
    for y in 0..1080 {
        for x in 0..1920 {
            img.pixel_mut(x, y)
                .copy_from_slice(&[(x / 8) as u8, (y / 5) as u8, 128]);
        }
    }
    img
}

fn observation() -> RectangleObservation {
    let p = NormalizedPoint::new;
    RectangleObservation {
        bounding_box: NormalizedRect::new(0.1, 0.1, 0.2, 0.2),
        top_left: p(0.1, 0.1),
        top_right: p(0.3, 0.1),
        bottom_left: p(0.1, 0.3),
        bottom_right: p(0.3, 0.3),
        confidence: 0.9,
    }
}

#[test]
fn hd_frame_rectifies_to_the_bounding_box_size() {
    let frame = hd_frame();
    let obs = observation();

    let (region, _) = obs.to_pixel(Size::new(1920.0, 1080.0));
    assert_relative_eq!(region.min_x(), 192.0, epsilon = 1e-3);
    assert_relative_eq!(region.min_y(), 108.0, epsilon = 1e-3);
    assert_relative_eq!(region.max_x(), 576.0, epsilon = 1e-3);
    assert_relative_eq!(region.max_y(), 324.0, epsilon = 1e-3);

    let out = rectify_observation(&frame.view(), &obs, &RectifyParams::default())
        .expect("region is inside the frame");
    assert_eq!((out.image.width, out.image.height), (384, 216));
    assert_eq!(out.image.channels, 3);
}

#[test]
fn batch_keeps_going_after_a_bad_detection() {
    let frame = hd_frame();
    let mut outside = observation();
    outside.bounding_box = NormalizedRect::new(1.2, 1.2, 0.2, 0.2);

    let out = rectify_batch(
        &frame.view(),
        &[outside, observation()],
        &RectifyParams {
            orientation: Orientation::Right,
            ..RectifyParams::default()
        },
    );
    assert!(matches!(out[0], Err(RectifyError::InvalidRegion { .. })));
    let img = &out[1].as_ref().expect("second detection").image;
    assert_eq!((img.width, img.height), (216, 384));
}

#[test]
fn rectified_png_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame = hd_frame();
    let out = rectify_observation(&frame.view(), &observation(), &RectifyParams::default())
        .expect("rectify");

    let path = dir.path().join("banner.png");
    save_image(&out.image, &path).expect("save");
    let back = load_frame(&path).expect("load");
    assert_eq!(back, out.image);
}

#[test]
fn recognized_banner_gets_a_link_and_an_overlay() {
    fn always_tele2(_: &advision::core::ImageView<'_>) -> Vec<Classification> {
        vec![Classification::new("Tele2", 0.93)]
    }

    let frame = hd_frame();
    let mut pipeline = BannerPipeline::new(always_tele2, PipelineParams::default());
    let outcomes = pipeline.process_frame(&frame.view(), &[observation()]);
    assert!(matches!(outcomes[0], DetectionOutcome::Recognized { .. }));

    let reference = pipeline.library().get("Tele2").expect("stored");
    // Portrait: 216 wide, 384 tall at 0.2 m wide.
    assert_relative_eq!(reference.physical_size().height, 0.2 * 384.0 / 216.0, epsilon = 1e-5);
    assert_eq!(LinkTable::default().url_for("Tele2"), Some("www.tele2.ru"));

    let anchor = place_anchor(1.25, &Pose::identity());
    let overlay = overlay_pose(&anchor);
    assert_relative_eq!(overlay.translation().z, -1.25);
}
