use std::cell::Cell;
use std::rc::Rc;

/// Host hook that schedules the next frame callback (one per display refresh).
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Caller-side control over a running frame loop.
///
/// Handles are cheap clones sharing one flag with the loop; any of them can
/// stop it.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
}

impl LoopHandle {
    /// Stop the loop. Idempotent; returns whether the loop was running.
    pub fn stop(&self) -> bool {
        let was_running = self.running.replace(false);
        if was_running {
            tracing::info!("frame loop stopped");
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

/// Self-rescheduling frame loop state.
///
/// Starts stopped. `start` schedules the first frame; every completed frame
/// schedules the next one while running. At most one frame request is
/// outstanding at a time, so a stop followed by a restart before the pending
/// callback fires still leaves a single chain of callbacks.
#[derive(Debug)]
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    scheduled: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            running: Rc::new(Cell::new(false)),
            scheduled: false,
            frames: 0,
        }
    }

    /// Enter RUNNING and schedule the first frame.
    ///
    /// Starting a loop that already runs schedules nothing and returns a
    /// handle to the same loop. Restarting while a request from before the
    /// stop is still pending reuses that request.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> LoopHandle {
        if !self.running.replace(true) {
            tracing::info!(frames = self.frames, "frame loop started");
            self.schedule(scheduler);
        }
        self.handle()
    }

    fn schedule<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if !self.scheduled {
            self.scheduled = true;
            scheduler.request_frame();
        }
    }

    /// Whether a frame request is outstanding.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Mark the outstanding request as serviced. Called at the top of every
    /// frame callback, whether or not the frame renders.
    pub(crate) fn begin_frame(&mut self) {
        self.scheduled = false;
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            running: Rc::clone(&self.running),
        }
    }

    pub fn state(&self) -> LoopState {
        if self.running.get() {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Frames completed since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Count a completed frame and reschedule while running.
    pub(crate) fn finish_frame<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.frames += 1;
        if self.running.get() {
            self.schedule(scheduler);
        }
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Requests(usize);

    impl FrameScheduler for Requests {
        fn request_frame(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn starts_stopped() {
        let frame_loop = FrameLoop::new();
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(frame_loop.frames(), 0);
    }

    #[test]
    fn start_schedules_first_frame_once() {
        let mut frame_loop = FrameLoop::new();
        let mut requests = Requests::default();
        let a = frame_loop.start(&mut requests);
        let b = frame_loop.start(&mut requests);
        assert_eq!(requests.0, 1);
        assert!(a.is_running() && b.is_running());
        assert_eq!(frame_loop.state(), LoopState::Running);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut frame_loop = FrameLoop::new();
        let mut requests = Requests::default();
        let handle = frame_loop.start(&mut requests);
        assert!(handle.stop());
        assert!(!handle.stop());
        assert!(!frame_loop.handle().stop());
        assert_eq!(frame_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn finished_frames_reschedule_only_while_running() {
        let mut frame_loop = FrameLoop::new();
        let mut requests = Requests::default();
        let handle = frame_loop.start(&mut requests);
        frame_loop.begin_frame();
        frame_loop.finish_frame(&mut requests);
        assert_eq!(requests.0, 2);
        handle.stop();
        frame_loop.begin_frame();
        frame_loop.finish_frame(&mut requests);
        assert_eq!(requests.0, 2);
        assert_eq!(frame_loop.frames(), 2);
        assert!(!frame_loop.is_scheduled());
    }

    #[test]
    fn restart_after_serviced_stop() {
        let mut frame_loop = FrameLoop::new();
        let mut requests = Requests::default();
        let handle = frame_loop.start(&mut requests);
        handle.stop();
        frame_loop.begin_frame();
        let again = frame_loop.start(&mut requests);
        assert_eq!(requests.0, 2);
        assert!(again.is_running());
        // Handles share the loop's flag.
        assert!(handle.is_running());
    }

    #[test]
    fn restart_reuses_pending_request() {
        let mut frame_loop = FrameLoop::new();
        let mut requests = Requests::default();
        let handle = frame_loop.start(&mut requests);
        handle.stop();
        frame_loop.start(&mut requests);
        assert_eq!(requests.0, 1);
        assert!(frame_loop.is_scheduled());
    }
}
