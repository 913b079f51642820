use advision_core::{
    rectify, Image, NormalizedPoint, NormalizedRect, PixelPoint, QuadCorners, RectifyParams, Size,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn frame(w: usize, h: usize) -> Image {
    let mut img = Image::new(w, h, 4);
    for y in 0..h {
        for x in 0..w {
            img.pixel_mut(x, y)
                .copy_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
    }
    img
}

fn bench_rectify(c: &mut Criterion) {
    let img = frame(1920, 1080);
    let size = Size::new(1920.0, 1080.0);
    let region = NormalizedRect::new(0.1, 0.1, 0.3, 0.3).scaled(size);
    let scaled = |x: f32, y: f32| -> PixelPoint { NormalizedPoint::new(x, y).scaled(size) };
    let corners = QuadCorners {
        top_left: scaled(0.12, 0.38),
        top_right: scaled(0.37, 0.4),
        bottom_left: scaled(0.1, 0.1),
        bottom_right: scaled(0.4, 0.13),
    };
    let params = RectifyParams::default();

    c.bench_function("rectify_1080p_quad", |b| {
        b.iter(|| {
            let out = rectify(&img.view(), black_box(&region), black_box(&corners), &params);
            black_box(out.map(|r| r.image.width))
        })
    });
}

criterion_group!(benches, bench_rectify);
criterion_main!(benches);
