// Loop drivers - two ways to repeat `Host::step`
//
// `run_native` owns the thread until the quit flag is seen. `SteppedDriver`
// hands control back after every iteration, for hosts that schedule frames
// themselves.

use super::Host;
use crate::error::FatalError;
use crate::platform::Platform;
use crate::subsystems::Subsystems;
use tracing::info;

/// Outcome of one externally scheduled frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Schedule another frame
    Continue,
    /// The quit flag is set; stop scheduling and shut down
    Exit,
}

/// Run iterations until the quit flag is observed between two of them
pub fn run_native<P: Platform>(
    host: &mut Host<P>,
    subsystems: &mut Subsystems<P>,
) -> Result<(), FatalError> {
    info!("entering frame loop");
    while !host.should_quit() {
        host.step(subsystems)?;
    }
    info!("leaving frame loop");
    Ok(())
}

/// One-iteration-per-call adapter over `Host::step`
pub struct SteppedDriver<P: Platform> {
    host: Host<P>,
    subsystems: Subsystems<P>,
    finished: bool,
}

impl<P: Platform> SteppedDriver<P> {
    pub fn new(host: Host<P>, subsystems: Subsystems<P>) -> Self {
        Self {
            host,
            subsystems,
            finished: false,
        }
    }

    /// Run exactly one iteration, unless the loop has already finished
    ///
    /// # Returns
    ///
    /// `LoopControl::Exit` once the quit flag is set. From then on every
    /// call returns `Exit` without stepping.
    pub fn frame(&mut self) -> Result<LoopControl, FatalError> {
        if self.finished || self.host.should_quit() {
            self.finished = true;
            return Ok(LoopControl::Exit);
        }
        if let Err(err) = self.host.step(&mut self.subsystems) {
            self.finished = true;
            return Err(err);
        }
        if self.host.should_quit() {
            self.finished = true;
            Ok(LoopControl::Exit)
        } else {
            Ok(LoopControl::Continue)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn host(&self) -> &Host<P> {
        &self.host
    }

    /// Give back the host and collaborators for shutdown
    pub fn into_parts(self) -> (Host<P>, Subsystems<P>) {
        (self.host, self.subsystems)
    }
}
