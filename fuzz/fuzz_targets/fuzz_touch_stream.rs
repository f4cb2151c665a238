#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use glide_core::{
    Contact, DragGrant, EdgeDetector, EdgeSpec, GestureClassifier, GestureConfig, PanelConfig,
    PanelController, TouchSample, Viewport,
};
use libfuzzer_sys::fuzz_target;

const VIEWPORT: Viewport = Viewport::new(400.0, 800.0);

#[derive(Debug, Arbitrary)]
enum Op {
    Down { id: u8, x: u16, y: u16 },
    Move { x: u16, y: u16 },
    Up { x: u16, y: u16 },
    Cancel,
    Advance { dt: u16 },
    Toggle,
    Destroy,
}

#[derive(Debug, Arbitrary)]
struct Input {
    edge_gated: bool,
    pinch: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let config = GestureConfig::default().with_pinch(input.pinch);
    let mut classifier = if input.edge_gated {
        let detector = EdgeDetector::new(EdgeSpec::default()).expect("default spec");
        GestureClassifier::edge_gated(config, detector, || VIEWPORT).expect("valid config")
    } else {
        GestureClassifier::new(config).expect("valid config")
    };
    let terminal = Rc::new(Cell::new(0u32));
    let t = Rc::clone(&terminal);
    classifier.on_tap(move |_| t.set(t.get() + 1));
    let t = Rc::clone(&terminal);
    classifier.on_long_press(move |_| t.set(t.get() + 1));
    let t = Rc::clone(&terminal);
    classifier.on_swipe(move |_| t.set(t.get() + 1));
    classifier.on_pinch(|delta| assert!(delta.scale.is_finite() && delta.scale > 0.0));

    let mut panel = PanelController::new(PanelConfig::default()).expect("valid config");
    let width = panel.config().width_px;

    let mut now = 0u64;
    let mut contacts: Vec<Contact> = Vec::new();

    for op in input.ops.iter().take(256) {
        match *op {
            Op::Down { id, x, y } => {
                let id = u32::from(id % 4);
                if contacts.iter().all(|c| c.id != id) {
                    contacts.push(Contact::new(id, f64::from(x), f64::from(y)));
                }
                let sample = TouchSample::down(now, &contacts);
                if !classifier.is_tracking() {
                    terminal.set(0);
                }
                classifier.start(&sample);
                if let Some(admission) = EdgeDetector::new(EdgeSpec::default())
                    .expect("default spec")
                    .admit(contacts[0].pos, VIEWPORT)
                {
                    let _ = panel.start_drag(DragGrant::Edge(admission), now);
                }
            }
            Op::Move { x, y } => {
                if let Some(first) = contacts.first_mut() {
                    first.pos.x = f64::from(x);
                    first.pos.y = f64::from(y);
                }
                classifier.move_to(&TouchSample::down(now, &contacts));
                panel.update_drag(f64::from(x) - 12.0, now);
            }
            Op::Up { x, y } => {
                let Some(mut lifted) = contacts.pop() else {
                    continue;
                };
                lifted.pos.x = f64::from(x);
                lifted.pos.y = f64::from(y);
                let sample = TouchSample {
                    timestamp_ms: now,
                    touches: contacts.clone(),
                    changed: vec![lifted],
                };
                classifier.end(&sample);
                if contacts.is_empty() {
                    panel.resolve_drag(now);
                }
            }
            Op::Cancel => {
                contacts.clear();
                classifier.cancel();
                panel.cancel_drag();
            }
            Op::Advance { dt } => {
                now = now.saturating_add(u64::from(dt));
                classifier.poll(now);
                panel.poll(now);
            }
            Op::Toggle => {
                panel.toggle(now);
            }
            Op::Destroy => {
                classifier.destroy();
                panel.destroy();
            }
        }

        assert!(terminal.get() <= 1, "more than one terminal event per session");
        let offset = panel.drag_offset_px();
        assert!(
            (-width..=0.0).contains(&offset),
            "panel offset {offset} outside [-{width}, 0]"
        );
        if classifier.is_destroyed() {
            assert_eq!(classifier.next_deadline(), None);
        }
    }
});
