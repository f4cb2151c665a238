#![forbid(unsafe_code)]

use criterion::{Criterion, criterion_group, criterion_main};
use glide_core::{
    DragGrant, Edge, EdgeDetector, EdgeSpec, GestureClassifier, GestureConfig, PanelConfig,
    PanelController, Point, TouchSample, Viewport,
};
use std::hint::black_box;

const PHONE: Viewport = Viewport::new(400.0, 800.0);

fn bench_classifier_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/classifier/session");

    group.bench_function("down_move_32_up_swipe", |b| {
        b.iter(|| {
            let mut classifier = GestureClassifier::new(GestureConfig::default())
                .expect("default config should be valid");
            classifier.on_swipe(|swipe| {
                black_box(swipe.direction);
            });

            black_box(classifier.start(&TouchSample::single(0, 20.0, 300.0)));
            for step in 0..32u32 {
                let x = 20.0 + f64::from(step) * 4.0;
                let t = u64::from(step) * 8;
                black_box(classifier.move_to(&TouchSample::single(t, x, 300.0)).suppress_default);
            }
            black_box(classifier.end(&TouchSample::lifted(260, 148.0, 300.0)).event());
        });
    });

    group.bench_function("edge_gated_rejected_start", |b| {
        let detector = EdgeDetector::new(EdgeSpec::at(Edge::Right)).expect("valid spec");
        let mut classifier =
            GestureClassifier::edge_gated(GestureConfig::default(), detector, || PHONE)
                .expect("default config should be valid");
        b.iter(|| {
            black_box(classifier.start(&TouchSample::single(0, 200.0, 300.0)).outcome);
        });
    });

    group.finish();
}

fn bench_panel_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/panel/drag");
    let admission = EdgeDetector::new(EdgeSpec::at(Edge::Left))
        .expect("valid spec")
        .admit(Point::new(4.0, 300.0), PHONE)
        .expect("inside band");

    group.bench_function("edge_drag_120_updates_resolve", |b| {
        b.iter(|| {
            let mut panel = PanelController::new(PanelConfig::default())
                .expect("default config should be valid");
            panel
                .start_drag(DragGrant::Edge(admission), 0)
                .expect("closed panel accepts edge drag");
            for step in 0..120u32 {
                let update = panel.update_drag(f64::from(step) * 2.0, u64::from(step) * 4);
                black_box(update.map(|u| u.drag_offset_px));
            }
            black_box(panel.resolve_drag(480));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_classifier_session, bench_panel_drag);
criterion_main!(benches);
