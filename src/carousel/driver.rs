use anyhow::{Result, anyhow};
use log::debug;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{Carousel, Direction, Phase};

/// User input a running carousel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Next,
    Previous,
    JumpTo(usize),
    /// Pointer entered the carousel.
    Pause,
    /// Pointer left the carousel.
    Resume,
    FinishTransition,
}

/// Number of cards on screen at once.
pub const VISIBLE_CARDS: usize = 3;

/// Published view of a running carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarouselSnapshot {
    pub index: usize,
    pub len: usize,
    pub direction: Direction,
    pub paused: bool,
    pub phase: Phase,
    /// "current / total", one-based.
    pub progress: String,
    /// Indices of the cards on screen, current first.
    pub window: Vec<usize>,
    /// Number of automatic advances so far.
    pub auto_advances: u64,
}

impl CarouselSnapshot {
    fn of<T>(carousel: &Carousel<T>, auto_advances: u64) -> Self {
        Self {
            index: carousel.index(),
            len: carousel.len(),
            direction: carousel.direction(),
            paused: carousel.is_paused(),
            phase: carousel.phase(),
            progress: carousel.progress_label(),
            window: carousel.visible_indices(VISIBLE_CARDS),
            auto_advances,
        }
    }
}

/// A carousel running on its own task.
///
/// The task owns the carousel, so commands and timer firings are applied one
/// at a time. It keeps a single pending deadline, recomputed after every event;
/// dropping the driver stops the task and with it the timer.
pub struct CarouselDriver {
    commands: mpsc::UnboundedSender<CarouselCommand>,
    snapshots: watch::Receiver<CarouselSnapshot>,
    task: JoinHandle<()>,
}

impl CarouselDriver {
    pub fn spawn<T: Send + 'static>(carousel: Carousel<T>) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (tx, snapshots) = watch::channel(CarouselSnapshot::of(&carousel, 0));
        let task = tokio::spawn(run(carousel, rx, tx));
        Self {
            commands,
            snapshots,
            task,
        }
    }

    pub fn send(&self, command: CarouselCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Carousel task has stopped"))
    }

    pub fn next(&self) -> Result<()> {
        self.send(CarouselCommand::Next)
    }

    pub fn previous(&self) -> Result<()> {
        self.send(CarouselCommand::Previous)
    }

    pub fn jump_to(&self, index: usize) -> Result<()> {
        self.send(CarouselCommand::JumpTo(index))
    }

    pub fn pause(&self) -> Result<()> {
        self.send(CarouselCommand::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(CarouselCommand::Resume)
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshots.clone()
    }

    /// Wait for the next published change.
    pub async fn changed(&mut self) -> Result<CarouselSnapshot> {
        self.snapshots
            .changed()
            .await
            .map_err(|_| anyhow!("Carousel task has stopped"))?;
        Ok(self.snapshots.borrow_and_update().clone())
    }
}

impl Drop for CarouselDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(
    mut carousel: Carousel<T>,
    mut commands: mpsc::UnboundedReceiver<CarouselCommand>,
    snapshots: watch::Sender<CarouselSnapshot>,
) {
    let mut auto_advances = 0u64;

    loop {
        let started = Instant::now();
        let deadline = carousel.time_until_advance().map(|wait| started + wait);

        let timer = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("Carousel command channel closed, stopping");
                    break;
                };
                // Credit the time spent waiting before applying the command
                if carousel.advance_clock(started.elapsed()).is_some() {
                    auto_advances += 1;
                }
                apply(&mut carousel, command);
            }
            _ = timer => {
                if let Some(transition) = carousel.advance_clock(started.elapsed()) {
                    debug!("Auto-advanced carousel {} -> {}", transition.from, transition.to);
                    auto_advances += 1;
                }
            }
        }

        let snapshot = CarouselSnapshot::of(&carousel, auto_advances);
        snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

fn apply<T>(carousel: &mut Carousel<T>, command: CarouselCommand) {
    debug!("Carousel command {:?}", command);
    match command {
        CarouselCommand::Next => {
            carousel.next();
        }
        CarouselCommand::Previous => {
            carousel.previous();
        }
        CarouselCommand::JumpTo(index) => {
            carousel.jump_to(index);
        }
        CarouselCommand::Pause => {
            carousel.pause();
        }
        CarouselCommand::Resume => {
            carousel.resume();
        }
        CarouselCommand::FinishTransition => carousel.finish_transition(),
    }
}
