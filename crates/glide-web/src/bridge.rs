#![forbid(unsafe_code)]

//! Classifier plumbing shared by the gesture adapters.
//!
//! Classifier listeners only queue events into an inbox. The adapter drains
//! the inbox after the classifier call returns, so application callbacks
//! never run while the classifier is mid-transition.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glide_core::{GestureClassifier, GestureEvent, Step, TouchSample};

type Inbox = Rc<RefCell<VecDeque<GestureEvent>>>;

/// Gesture kinds an adapter wants delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Interests {
    pub tap: bool,
    pub long_press: bool,
    pub swipe: bool,
    pub pinch: bool,
}

/// Classifier plus event inbox.
#[derive(Debug)]
pub(crate) struct GestureBridge {
    classifier: GestureClassifier,
    inbox: Inbox,
}

impl GestureBridge {
    pub(crate) fn new(mut classifier: GestureClassifier, interests: Interests) -> Self {
        let inbox: Inbox = Rc::default();
        if interests.tap {
            let queue = Rc::clone(&inbox);
            classifier.on_tap(move |event| queue.borrow_mut().push_back((*event).into()));
        }
        if interests.long_press {
            let queue = Rc::clone(&inbox);
            classifier.on_long_press(move |event| queue.borrow_mut().push_back((*event).into()));
        }
        if interests.swipe {
            let queue = Rc::clone(&inbox);
            classifier.on_swipe(move |event| queue.borrow_mut().push_back((*event).into()));
        }
        if interests.pinch {
            let queue = Rc::clone(&inbox);
            classifier.on_pinch(move |event| queue.borrow_mut().push_back((*event).into()));
        }
        Self { classifier, inbox }
    }

    pub(crate) fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub(crate) fn start(&mut self, sample: &TouchSample) -> (Step, Vec<GestureEvent>) {
        let step = self.classifier.start(sample);
        (step, self.drain())
    }

    pub(crate) fn move_to(&mut self, sample: &TouchSample) -> (Step, Vec<GestureEvent>) {
        let step = self.classifier.move_to(sample);
        (step, self.drain())
    }

    pub(crate) fn end(&mut self, sample: &TouchSample) -> (Step, Vec<GestureEvent>) {
        let step = self.classifier.end(sample);
        (step, self.drain())
    }

    pub(crate) fn cancel(&mut self) -> Step {
        let step = self.classifier.cancel();
        self.inbox.borrow_mut().clear();
        step
    }

    pub(crate) fn poll(&mut self, now_ms: u64) -> Vec<GestureEvent> {
        self.classifier.poll(now_ms);
        self.drain()
    }

    pub(crate) fn destroy(&mut self) -> bool {
        let destroyed = self.classifier.destroy();
        self.inbox.borrow_mut().clear();
        destroyed
    }

    fn drain(&self) -> Vec<GestureEvent> {
        self.inbox.borrow_mut().drain(..).collect()
    }
}
