extern crate image as png;

extern crate lossy_dct;

/// Reads any image, simulates the lossy round trip, and writes the reconstruction as png.
///
/// Usage: `cargo run --release --example reconstruct -- input.jpg [output.png] [quality]`
fn main() {
    use lossy_dct::prelude::*;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
        )
        .init();

    let mut arguments = std::env::args().skip(1);
    let input = arguments.next().expect("specify an input image path as the first argument");
    let output = arguments.next().unwrap_or_else(|| "reconstruction.png".to_string());
    let quality: u8 = arguments.next().map_or(50, |quality| quality.parse().expect("quality must be a number"));

    let rgb = png::open(&input).expect("input image could not be read").into_rgb8();
    let size = Vec2(rgb.width() as usize, rgb.height() as usize);

    let tables = QuantizationTables::with_quality(quality).expect("quality must be in 1 ..= 100");
    let round_trip = LossyRoundTrip::new(tables, ProcessOptions::default()).unwrap();

    let start_time = ::std::time::Instant::now();
    let reconstructed = round_trip.process_rgb(size, rgb.as_raw()).expect("round trip failed");
    let duration = start_time.elapsed();

    let output_image = png::RgbImage::from_raw(rgb.width(), rgb.height(), reconstructed)
        .expect("reconstruction has the size of the input");

    output_image.save(&output).expect("output image could not be written");
    println!("reconstructed {} as {} in {:?}", input, output, duration);
}
