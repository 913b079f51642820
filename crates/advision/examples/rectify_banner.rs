use advision::banner::{rectify_observation, RectangleObservation};
use advision::core::{NormalizedPoint, Orientation, RectifyParams};
use advision::frame::{load_frame, save_image};

#[cfg(feature = "tracing")]
use advision::core::init_tracing;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false);

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("Usage: rectify_banner <frame> <output.png> [tlx tly trx try blx bly brx bry]");
        return Ok(());
    };

    let coords: Vec<f32> = args.map(|a| a.parse()).collect::<Result<_, _>>()?;
    let c = if coords.len() == 8 {
        coords
    } else {
        vec![0.2, 0.8, 0.8, 0.8, 0.2, 0.2, 0.8, 0.2]
    };
    let p = NormalizedPoint::new;
    let obs = RectangleObservation::from_corners(
        p(c[0], c[1]),
        p(c[2], c[3]),
        p(c[4], c[5]),
        p(c[6], c[7]),
    );

    let frame = load_frame(&input)?;
    let params = RectifyParams {
        orientation: Orientation::Up,
        ..RectifyParams::default()
    };
    match rectify_observation(&frame.view(), &obs, &params) {
        Ok(r) => {
            save_image(&r.image, &output)?;
            println!("wrote {}x{} to {}", r.image.width, r.image.height, output);
        }
        Err(e) => println!("detection dropped: {e}"),
    }

    Ok(())
}
