use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fp_slicer::filters::{Filter, FilterPipeline};

mod common;

fn binary_half() -> fp_slicer::PixelBuffer {
    // Half card at analysis resolution
    let mut card = common::synthetic_card(4000, 2400)
        .scale(0.125)
        .expect("valid factor");
    card.binarize(10);
    card.cut(fp_slicer::Rectangle::full(card.width(), card.height() / 2))
        .expect("half fits")
}

fn bench_card_pipeline(c: &mut Criterion) {
    let half = binary_half();
    let pipeline = FilterPipeline::card();
    c.bench_function("card_pipeline_500x150", |b| {
        b.iter(|| {
            let mut buffer = half.clone();
            pipeline.apply(black_box(&mut buffer));
            buffer
        })
    });
}

fn bench_block_majority(c: &mut Criterion) {
    let half = binary_half();
    let step = Filter::BlockMajority { bw: 5, bh: 9 };
    c.bench_function("block_majority_5x9", |b| {
        b.iter(|| {
            let mut buffer = half.clone();
            step.apply(black_box(&mut buffer));
            buffer
        })
    });
}

fn bench_black_run(c: &mut Criterion) {
    let half = binary_half();
    let step = Filter::StripHorizontalBlackRun { bw: 5, bh: 21 };
    c.bench_function("strip_horizontal_black_run_5x21", |b| {
        b.iter(|| {
            let mut buffer = half.clone();
            step.apply(black_box(&mut buffer));
            buffer
        })
    });
}

criterion_group!(
    benches,
    bench_card_pipeline,
    bench_block_majority,
    bench_black_run
);
criterion_main!(benches);
