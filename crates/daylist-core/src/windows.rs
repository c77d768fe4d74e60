use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

pub trait ManagedWindow {
    fn is_visible(&self) -> bool;
}

/// Deduplicates windows by logical name. A hidden or disposed window does
/// not block recreation.
#[derive(Debug, Default)]
pub struct WindowRegistry<W: ManagedWindow> {
    windows: HashMap<String, W>,
}

impl<W: ManagedWindow> WindowRegistry<W> {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }

    pub fn get_or_create(&mut self, name: &str, factory: impl FnOnce() -> W) -> &mut W {
        match self.windows.entry(name.to_string()) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_visible() {
                    debug!(name, "registered window no longer visible; rebuilding");
                    occupied.insert(factory());
                }
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => {
                debug!(name, "no registered window; creating");
                vacant.insert(factory())
            }
        }
    }

    pub fn get_visible(&self, name: &str) -> Option<&W> {
        self.windows.get(name).filter(|w| w.is_visible())
    }

    pub fn remove(&mut self, name: &str) -> Option<W> {
        self.windows.remove(name)
    }
}
