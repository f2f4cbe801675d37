use parking_lot::Mutex;

type Callback<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Explicit listener registry: the owner holds the data and emits change
/// events, subscribers register callbacks and never learn about each
/// other. Callbacks run on the emitting thread and must not subscribe
/// to the same registry from inside the callback.
pub struct Listeners<E> {
    callbacks: Mutex<Vec<Callback<E>>>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.callbacks.lock().push(Box::new(callback));
    }

    pub fn emit(&self, event: &E) {
        for callback in self.callbacks.lock().iter() {
            callback(event);
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_reaches_every_subscriber() {
        let listeners = Listeners::<u32>::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = count.clone();
            listeners.subscribe(move |n: &u32| {
                count.fetch_add(*n as usize, Ordering::SeqCst);
            });
        }

        listeners.emit(&2);
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn emit_without_subscribers_is_a_noop() {
        let listeners = Listeners::<u32>::new();
        listeners.emit(&1);
    }
}
