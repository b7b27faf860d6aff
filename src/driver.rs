//! Hosts a [`SessionController`] on the thread-default glib main context:
//! the elapsed-time counter and the resolving window become glib timeout
//! sources whose ids are kept so they can be removed on restart.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use glib::{ControlFlow, SourceId};

use crate::game::{
    EngineError, Resolution, ResolutionTicket, RevealOutcome, SessionController, Tier,
};

#[derive(Default)]
struct Sources {
    timer: Option<SourceId>,
    resolution: Option<SourceId>,
}

pub struct GlibSession<A: 'static> {
    controller: Rc<RefCell<SessionController<A>>>,
    sources: Rc<RefCell<Sources>>,
}

impl<A: Clone + Eq + Hash + 'static> GlibSession<A> {
    pub fn new(controller: SessionController<A>) -> Self {
        GlibSession {
            controller: Rc::new(RefCell::new(controller)),
            sources: Rc::new(RefCell::new(Sources::default())),
        }
    }

    /// Shared handle for read access and event subscriptions. Do not hold a
    /// borrow across main-loop iterations.
    pub fn controller(&self) -> Rc<RefCell<SessionController<A>>> {
        Rc::clone(&self.controller)
    }

    pub fn start(&self, tier: Tier) -> Result<(), EngineError> {
        let result = self.controller.borrow_mut().start(tier);
        if result.is_ok() {
            self.cancel_resolution();
        }
        self.start_timer();
        result
    }

    pub fn restart(&self) -> Result<(), EngineError> {
        let result = self.controller.borrow_mut().restart();
        if result.is_ok() {
            self.cancel_resolution();
        }
        self.start_timer();
        result
    }

    pub fn stop(&self) {
        self.cancel_resolution();
        self.stop_timer();
        self.controller.borrow_mut().stop();
    }

    pub fn pause(&self) -> bool {
        let paused = self.controller.borrow_mut().pause();
        if paused {
            self.stop_timer();
        }
        paused
    }

    pub fn resume(&self) -> bool {
        let resumed = self.controller.borrow_mut().resume();
        if resumed {
            self.start_timer();
        }
        resumed
    }

    pub fn click(&self, index: usize) -> Result<RevealOutcome, EngineError> {
        let outcome = self.controller.borrow_mut().attempt_reveal(index)?;
        if let RevealOutcome::AwaitingResolution(ticket) = outcome {
            self.schedule_resolution(ticket);
        }
        Ok(outcome)
    }

    fn schedule_resolution(&self, ticket: ResolutionTicket) {
        self.cancel_resolution();
        let controller = Rc::clone(&self.controller);
        let sources = Rc::clone(&self.sources);
        let handle = glib::timeout_add_local_once(ticket.delay(), move || {
            sources.borrow_mut().resolution = None;
            let resolution = controller.borrow_mut().resolve(ticket);
            if let Resolution::Completed { .. } = resolution
                && let Some(timer) = sources.borrow_mut().timer.take()
            {
                timer.remove();
            }
        });
        self.sources.borrow_mut().resolution = Some(handle);
    }

    fn cancel_resolution(&self) {
        if let Some(handle) = self.sources.borrow_mut().resolution.take() {
            handle.remove();
        }
    }

    fn start_timer(&self) {
        self.stop_timer();
        let (running, interval) = {
            let ctl = self.controller.borrow();
            (ctl.is_clock_running(), ctl.config().tick_interval())
        };
        if !running {
            return;
        }

        let delta = interval.as_secs_f64();
        let controller = Rc::clone(&self.controller);
        let sources = Rc::clone(&self.sources);
        let handle = glib::timeout_add_local(interval, move || {
            let mut ctl = controller.borrow_mut();
            if !ctl.is_clock_running() {
                sources.borrow_mut().timer = None;
                return ControlFlow::Break;
            }
            if let Err(err) = ctl.tick(delta) {
                log::warn!("timer tick rejected: {err}");
            }
            ControlFlow::Continue
        });
        self.sources.borrow_mut().timer = Some(handle);
    }

    fn stop_timer(&self) {
        if let Some(handle) = self.sources.borrow_mut().timer.take() {
            handle.remove();
        }
    }
}

impl<A: 'static> Drop for GlibSession<A> {
    fn drop(&mut self) {
        let mut sources = self.sources.borrow_mut();
        if let Some(handle) = sources.timer.take() {
            handle.remove();
        }
        if let Some(handle) = sources.resolution.take() {
            handle.remove();
        }
    }
}
