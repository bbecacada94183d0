//! Change notifications from the engine to the presentation layer.
//!
//! The engine announces which patient's data changed and in which table;
//! screens subscribe and decide for themselves what to rebuild. The engine
//! side knows nothing about widgets or tabs.

use crate::models::enums::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityChange {
    pub patient_id: i64,
    pub entity: EntityKind,
}

type Listener = Box<dyn Fn(&EntityChange) + Send>;

#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Listener>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&EntityChange) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn notify(&self, change: EntityChange) {
        tracing::debug!(
            patient_id = change.patient_id,
            entity = change.entity.as_str(),
            "entity changed"
        );
        for listener in &self.listeners {
            listener(&change);
        }
    }
}
