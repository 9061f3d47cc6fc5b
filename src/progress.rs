use std::time::Duration;

use tokio::task::JoinHandle;

use crate::document::{Document, SharedDocument};

pub const BAR: &str = "build-bar";
pub const PCT: &str = "build-pct";

const START: f64 = 72.0;
const STEP: f64 = 0.3;
const CEILING: f64 = 98.0;
const TICK: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    Skipped,
    Advanced(f64),
    Completed,
}

/// Simulated progress of the running build. Purely cosmetic.
#[derive(Debug)]
pub struct BuildProgress {
    percent: f64,
    done: bool,
}

impl Default for BuildProgress {
    fn default() -> Self {
        Self {
            percent: START,
            done: false,
        }
    }
}

impl BuildProgress {
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn tick(&mut self, doc: &mut Document) -> Tick {
        if self.done || !doc.contains(BAR) {
            return Tick::Skipped;
        }

        if self.percent < CEILING {
            self.percent += STEP;
            doc.set_style(BAR, "width", &format!("{:.1}%", self.percent));
            doc.set_text(PCT, &format!("{}%", self.percent.floor()));
            Tick::Advanced(self.percent)
        } else {
            self.done = true;
            doc.set_style(BAR, "background", "var(--green)");
            doc.set_style(BAR, "width", "100%");
            if doc.set_text(PCT, "Done") {
                doc.set_class(PCT, "progress-pct up");
            }
            Tick::Completed
        }
    }
}

pub fn spawn(document: SharedDocument) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut progress = BuildProgress::default();
        let mut interval = tokio::time::interval(TICK);
        // the first tick of an interval fires immediately
        interval.tick().await;

        while !progress.is_done() {
            interval.tick().await;
            let mut doc = document.lock().await;
            if progress.tick(&mut doc) == Tick::Completed {
                tracing::info!("Build progress animation finished");
            }
        }
    })
}
