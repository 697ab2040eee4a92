//! Headless driver for the flock simulator: stands in for the frame timer
//! and the mouse, and streams frame snapshots as JSON lines.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use boid_core::{FlockConfig, FlockSimulator};
use boid_shared::{BoidSettings, ClickEvent, FrameSnapshot};

/// Reads a JSON settings file. Fields it leaves out keep their defaults.
pub fn load_settings(path: &Path) -> Result<BoidSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

/// Reads a JSON array of click events and orders them by frame.
pub fn load_events(path: &Path) -> Result<Vec<ClickEvent>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file {}", path.display()))?;
    let mut events: Vec<ClickEvent> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid events in {}", path.display()))?;
    // Stable, so clicks on the same frame keep their file order
    events.sort_by_key(|event| event.frame);
    Ok(events)
}

pub struct HeadlessRunner<W: Write> {
    simulator: FlockSimulator,
    events: Vec<ClickEvent>,
    next_event: usize,
    every: Option<u64>,
    output: W,
}

impl<W: Write> HeadlessRunner<W> {
    pub fn new(
        config: FlockConfig,
        seed: u64,
        events: Vec<ClickEvent>,
        every: Option<u64>,
        output: W,
    ) -> Result<Self> {
        let simulator =
            FlockSimulator::with_seed(config, seed).context("Invalid simulation settings")?;

        log::info!(
            "Simulating {} boids in a {}x{} world (seed {})",
            simulator.len(),
            config.width,
            config.height,
            seed
        );

        Ok(Self {
            simulator,
            events,
            next_event: 0,
            every,
            output,
        })
    }

    /// Runs `steps` ticks and writes the requested snapshots.
    /// The last frame is always written.
    pub fn run(&mut self, steps: u64) -> Result<()> {
        let mut last_written = None;

        for _ in 0..steps {
            self.queue_due_events();
            self.simulator.tick();

            let frame = self.simulator.frame();
            if self.every.is_some_and(|every| frame % every == 0) {
                self.write_snapshot()?;
                last_written = Some(frame);
            }
        }

        if last_written != Some(self.simulator.frame()) {
            self.write_snapshot()?;
        }

        let skipped = self.events.len() - self.next_event;
        if skipped > 0 {
            log::warn!("{} click events were scheduled after the last frame", skipped);
        }

        log::info!(
            "Finished at frame {} with {} boids",
            self.simulator.frame(),
            self.simulator.len()
        );
        self.output.flush().context("Failed to flush output")?;
        Ok(())
    }

    pub fn simulator(&self) -> &FlockSimulator {
        &self.simulator
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn queue_due_events(&mut self) {
        let frame = self.simulator.frame();
        while let Some(event) = self.events.get(self.next_event) {
            if event.frame > frame {
                break;
            }
            log::debug!(
                "Frame {}: {:?} click at ({:.1}, {:.1})",
                frame,
                event.button,
                event.position.x,
                event.position.y
            );
            self.simulator.queue((*event).into());
            self.next_event += 1;
        }
    }

    fn write_snapshot(&mut self) -> Result<()> {
        let snapshot = FrameSnapshot::capture(&self.simulator);
        serde_json::to_writer(&mut self.output, &snapshot)
            .context("Failed to serialize snapshot")?;
        writeln!(self.output).context("Failed to write snapshot")?;
        Ok(())
    }
}
