//! Optional progress reporting for the slow parts of a run, which is reading raw files.

use std::cell::RefCell;

use indicatif::{ProgressBar, ProgressStyle};

pub trait Progress {
    /// Starts a new stage. `total` is unknown for streamed inputs.
    fn start(&self, label: &str, total: Option<u64>);
    fn inc(&self, delta: u64);
    fn finish(&self);
}

/// Reports nothing.
pub struct Silent;

impl Progress for Silent {
    fn start(&self, _label: &str, _total: Option<u64>) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self) {}
}

/// Terminal progress bar, or a spinner when the total is unknown.
#[derive(Default)]
pub struct Bar {
    current: RefCell<Option<ProgressBar>>,
}

impl Bar {
    pub fn new() -> Self {
        Bar::default()
    }
}

impl Progress for Bar {

    fn start(&self, label: &str, total: Option<u64>) {
        let (bar, template) = match total {
            Some(total) => (
                ProgressBar::new(total),
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
            ),
            None => (
                ProgressBar::new_spinner(),
                "[{elapsed_precise}] {spinner} {pos} {msg}",
            ),
        };

        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.set_message(label.to_string());

        if let Some(previous) = self.current.replace(Some(bar)) {
            previous.finish_and_clear();
        }
    }

    fn inc(&self, delta: u64) {
        if let Some(bar) = self.current.borrow().as_ref() {
            bar.inc(delta);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.current.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
pub mod testing {

    use std::cell::{Cell, RefCell};

    use super::Progress;

    /// Records what it is told, for assertions in tests.
    #[derive(Default)]
    pub struct Recorder {
        pub labels: RefCell<Vec<String>>,
        pub count: Cell<u64>,
        pub finished: Cell<usize>,
    }

    impl Progress for Recorder {
        fn start(&self, label: &str, _total: Option<u64>) {
            self.labels.borrow_mut().push(label.to_string());
        }

        fn inc(&self, delta: u64) {
            self.count.set(self.count.get() + delta);
        }

        fn finish(&self) {
            self.finished.set(self.finished.get() + 1);
        }
    }
}
