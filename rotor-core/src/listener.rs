use std::fmt;

/// A single-slot, replaceable callback.
///
/// Setting a new callback drops the previous one; there is never more than
/// one subscriber per event.
pub struct Listener<A> {
    callback: Option<Box<dyn FnMut(A)>>,
}

impl<A> Default for Listener<A> {
    fn default() -> Self {
        Self { callback: None }
    }
}

impl<A> fmt::Debug for Listener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("is_set", &self.is_set())
            .finish()
    }
}

impl<A> Listener<A> {
    pub fn set(&mut self, callback: impl FnMut(A) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear(&mut self) {
        self.callback = None;
    }

    pub fn is_set(&self) -> bool {
        self.callback.is_some()
    }

    /// Invoke the callback, returning whether anyone was listening.
    pub fn emit(&mut self, value: A) -> bool {
        match self.callback.as_mut() {
            Some(callback) => {
                callback(value);
                true
            }
            None => false,
        }
    }
}
