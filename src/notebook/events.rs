use std::rc::Rc;

use super::Notebook;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// the execution backend finished starting and answered its info request
    KernelReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&mut Notebook)>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    handlers: Vec<(SubscriptionId, HostEvent, Handler)>,
}

impl EventBus {
    pub fn subscribe(&mut self, event: HostEvent, handler: impl Fn(&mut Notebook) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, event, Rc::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _, _)| *sid != id);
        self.handlers.len() != before
    }

    pub fn subscriber_count(&self, event: HostEvent) -> usize {
        self.handlers.iter().filter(|(_, e, _)| *e == event).count()
    }

    // cloned out so handlers may borrow the notebook mutably
    pub(super) fn handlers_for(&self, event: HostEvent) -> Vec<Handler> {
        self.handlers
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, h)| Rc::clone(h))
            .collect()
    }
}
