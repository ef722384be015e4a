//! crates/quiz_core/src/navigation.rs
//!
//! The slide navigation state machine: tracks the current position within a
//! deck, enforces bounds, and notifies an observer on every transition.
//!
//! Overlapping transitions (e.g. a duplicate key event landing during the
//! slide animation) are debounced by an explicit guard: after a successful
//! `go_to` the machine rejects further transitions until the caller signals
//! `finish_transition`. This replaces a wall-clock delay so the machine is
//! testable without timers. It is a UX debounce for a single control thread,
//! not a concurrency primitive.

/// Notification payload for a successful slide transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub index: usize,
    /// True when the transition landed on the final (summary) slide.
    pub is_last: bool,
}

type Observer = Box<dyn Fn(SlideChange) + Send>;

/// Position state machine over a deck of `total_slides` slides.
pub struct SlideNavigator {
    current: usize,
    total_slides: usize,
    in_transition: bool,
    observer: Option<Observer>,
}

impl SlideNavigator {
    /// Creates a navigator at slide 0. `total_slides` must be at least 1;
    /// a built deck always has the Welcome and Summary slides.
    pub fn new(total_slides: usize) -> Self {
        debug_assert!(total_slides > 0);
        Self {
            current: 0,
            total_slides,
            in_transition: false,
            observer: None,
        }
    }

    /// Creates a navigator that invokes `observer` synchronously on every
    /// successful transition.
    pub fn with_observer(total_slides: usize, observer: impl Fn(SlideChange) + Send + 'static) -> Self {
        let mut nav = Self::new(total_slides);
        nav.observer = Some(Box::new(observer));
        nav
    }

    pub fn current_slide(&self) -> usize {
        self.current
    }

    pub fn total_slides(&self) -> usize {
        self.total_slides
    }

    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.total_slides
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 0
    }

    /// Jumps to `index`. Out-of-range indices and calls made while a
    /// transition is pending are silent no-ops (pressing "next" on the last
    /// slide is a normal edge, not an error). Returns whether the transition
    /// happened.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total_slides || self.in_transition {
            return false;
        }
        self.in_transition = true;
        self.current = index;
        if let Some(observer) = &self.observer {
            observer(SlideChange {
                index,
                is_last: index == self.total_slides - 1,
            });
        }
        true
    }

    /// Marks the in-flight transition as finished, unlocking `go_to`.
    /// The UI calls this when its slide animation completes.
    pub fn finish_transition(&mut self) {
        self.in_transition = false;
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.go_to(self.current - 1)
    }

    pub fn reset(&mut self) -> bool {
        self.go_to(0)
    }

    /// Progress through the deck as a percentage in `(0, 100]`.
    pub fn progress_percent(&self) -> f64 {
        (self.current + 1) as f64 / self.total_slides as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn advanced(nav: &mut SlideNavigator, index: usize) {
        assert!(nav.go_to(index));
        nav.finish_transition();
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut nav = SlideNavigator::new(5);
        assert!(!nav.go_to(5));
        assert!(!nav.go_to(100));
        assert_eq!(nav.current_slide(), 0);
        assert!(!nav.in_transition());
    }

    #[test]
    fn previous_at_start_and_next_at_end_do_nothing() {
        let mut nav = SlideNavigator::new(3);
        assert!(!nav.previous());
        advanced(&mut nav, 2);
        assert!(!nav.next());
        assert_eq!(nav.current_slide(), 2);
    }

    #[test]
    fn next_then_previous_returns_to_origin() {
        for start in 1..6 {
            let mut nav = SlideNavigator::new(8);
            advanced(&mut nav, start);
            assert!(nav.next());
            nav.finish_transition();
            assert!(nav.previous());
            nav.finish_transition();
            assert_eq!(nav.current_slide(), start);
        }
    }

    #[test]
    fn transitions_are_debounced_until_finished() {
        let mut nav = SlideNavigator::new(10);
        assert!(nav.next());
        // A duplicate event during the animation must not skip a slide.
        assert!(!nav.next());
        assert_eq!(nav.current_slide(), 1);
        nav.finish_transition();
        assert!(nav.next());
        assert_eq!(nav.current_slide(), 2);
    }

    #[test]
    fn reset_goes_back_to_the_welcome_slide() {
        let mut nav = SlideNavigator::new(6);
        advanced(&mut nav, 4);
        assert!(nav.reset());
        assert_eq!(nav.current_slide(), 0);
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        let total = 17;
        let mut nav = SlideNavigator::new(total);
        assert!((nav.progress_percent() - 100.0 / total as f64).abs() < 1e-9);
        let mut last = nav.progress_percent();
        while nav.can_go_next() {
            nav.next();
            nav.finish_transition();
            let progress = nav.progress_percent();
            assert!(progress >= last);
            last = progress;
        }
        assert!((nav.progress_percent() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn observer_sees_every_successful_transition() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut nav = SlideNavigator::with_observer(3, move |change| {
            sink.lock().unwrap().push(change);
        });
        nav.next();
        nav.finish_transition();
        nav.go_to(99); // rejected, must not notify
        nav.next();
        nav.finish_transition();
        let changes = seen.lock().unwrap();
        assert_eq!(
            *changes,
            vec![
                SlideChange { index: 1, is_last: false },
                SlideChange { index: 2, is_last: true },
            ]
        );
    }
}
