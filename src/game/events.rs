use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    ScoreChanged { score: u32 },
    TimerTick { elapsed_seconds: f64 },
    SessionCompleted { final_score: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&SessionEvent)>;

/// Subscribers for session events. Listeners run synchronously on the
/// thread that mutates the session and must not call back into it.
#[derive(Default)]
pub struct EventHub {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl EventHub {
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: SessionEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}
