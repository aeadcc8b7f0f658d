#[macro_use]
extern crate bencher;

extern crate lossy_dct;
use lossy_dct::prelude::*;

use bencher::Bencher;

const SIZE: Vec2<usize> = Vec2(1023, 767);

fn test_rgb() -> Vec<u8> {
    (0 .. SIZE.area() * 3).map(|index| (index * 31 % 251) as u8).collect()
}

/// Transform and quantize a single block
fn single_block(bench: &mut Bencher) {
    let transform = TransformMatrix::for_blocks();
    let codec = BlockCodec::new(&transform, Rounding::default()).unwrap();
    let table = QuantizationTable::standard_luma();

    let mut block = [0.0_f32; BLOCK_SAMPLE_COUNT];
    block.iter_mut().enumerate().for_each(|(index, sample)| *sample = (index as f32 * 0.7).sin() * 100.0);

    bench.iter(||{
        let result = codec.encode_decode(&block, &table).unwrap();
        bencher::black_box(result);
    })
}

/// Process one channel on the current thread
fn channel_sequential(bench: &mut Bencher) {
    let round_trip = LossyRoundTrip::new(QuantizationTables::standard(), ProcessOptions::default().sequential()).unwrap();
    let planes = YCbCrPlanes::from_rgb(SIZE, &test_rgb()).unwrap();

    bench.iter(||{
        let channel = round_trip.process_channel(&planes.y, ChannelClass::Luma).unwrap();
        bencher::black_box(channel);
    })
}

/// Process one channel with multi-core block processing
fn channel_parallel(bench: &mut Bencher) {
    let round_trip = LossyRoundTrip::new(QuantizationTables::standard(), ProcessOptions::default().parallel()).unwrap();
    let planes = YCbCrPlanes::from_rgb(SIZE, &test_rgb()).unwrap();

    bench.iter(||{
        let channel = round_trip.process_channel(&planes.y, ChannelClass::Luma).unwrap();
        bencher::black_box(channel);
    })
}

/// Convert, process all planes, and convert back
fn rgb_image(bench: &mut Bencher) {
    let round_trip = LossyRoundTrip::standard();
    let rgb = test_rgb();

    bench.iter(||{
        let result = round_trip.process_rgb(SIZE, &rgb).unwrap();
        bencher::black_box(result);
    })
}

benchmark_group!(process,
    single_block,
    channel_sequential,
    channel_parallel,
    rgb_image
);

benchmark_main!(process);
