//! Ambient logging context
//!
//! `LogContext` keeps a stack of property maps for the current logical flow of
//! execution. Every entry built while a context is active picks up the merged
//! properties, innermost frame winning on key collisions.
//!
//! - Synchronous code: [`LogContext::push`] returns a [`LogContextGuard`]; dropping it
//!   restores the previous context, also on early return or panic unwind.
//! - Async code: [`LogContext::scope`] runs a future with an extra frame installed in
//!   tokio task-local storage. The frame follows the future across threads and is gone
//!   when the future completes or is dropped.
//! - Child work: [`LogContext::spawn`], [`LogContext::bind`] and
//!   [`LogContext::spawn_thread`] carry the current context into spawned tasks/threads.
//!
//! Unrelated tasks and threads never observe each other's frames.

use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use super::properties::{FieldValue, Properties};

type Slot = RefCell<Option<Arc<ContextFrame>>>;

thread_local! {
    static THREAD_CONTEXT: Slot = const { RefCell::new(None) };
}

tokio::task_local! {
    static TASK_CONTEXT: Slot;
}

#[derive(Debug)]
struct ContextFrame {
    parent: Option<Arc<ContextFrame>>,
    properties: Properties,
}

/// Run `f` against the slot of the current logical flow.
///
/// Inside a [`LogContext::scope`]/[`LogContext::bind`] future that is the task-local
/// slot, otherwise the thread-local one.
fn with_slot<R>(f: impl FnOnce(&Slot) -> R) -> R {
    if TASK_CONTEXT.try_with(|_| ()).is_ok() {
        TASK_CONTEXT.with(f)
    } else {
        THREAD_CONTEXT.with(f)
    }
}

/// Immutable capture of a logical flow's context
#[derive(Debug, Clone, Default)]
pub struct ContextSnapshot {
    frame: Option<Arc<ContextFrame>>,
}

impl ContextSnapshot {
    /// Merged properties of every frame, innermost wins
    pub fn properties(&self) -> Properties {
        let mut frames = Vec::new();
        let mut cursor = self.frame.as_ref();
        while let Some(frame) = cursor {
            frames.push(frame);
            cursor = frame.parent.as_ref();
        }

        let mut merged = Properties::new();
        for frame in frames.into_iter().rev() {
            for (key, value) in &frame.properties {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Number of frames on the stack
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.frame.as_ref();
        while let Some(frame) = cursor {
            depth += 1;
            cursor = frame.parent.as_ref();
        }
        depth
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_none()
    }

    fn child(&self, properties: Properties) -> Option<Arc<ContextFrame>> {
        Some(Arc::new(ContextFrame {
            parent: self.frame.clone(),
            properties,
        }))
    }
}

/// Entry points for the ambient context stack
pub struct LogContext;

impl LogContext {
    /// Capture the current context
    pub fn current() -> ContextSnapshot {
        ContextSnapshot {
            frame: with_slot(|slot| slot.borrow().clone()),
        }
    }

    /// Merged properties of the current context
    pub fn properties() -> Properties {
        Self::current().properties()
    }

    /// Push a frame for the rest of the enclosing block
    ///
    /// # Example
    ///
    /// ```
    /// use tempmail_logging::core::{properties, LogContext};
    ///
    /// {
    ///     let _ctx = LogContext::push(properties([("chat_id", 42.into())]));
    ///     assert!(LogContext::properties().contains_key("chat_id"));
    /// }
    /// assert!(LogContext::properties().is_empty());
    /// ```
    #[must_use = "the context is popped as soon as the guard is dropped"]
    pub fn push(properties: Properties) -> LogContextGuard {
        let frame = Self::current().child(properties);
        LogContextGuard::install(frame)
    }

    /// Push a single property
    #[must_use = "the context is popped as soon as the guard is dropped"]
    pub fn push_property(key: impl Into<String>, value: impl Into<FieldValue>) -> LogContextGuard {
        let mut properties = Properties::new();
        properties.insert(key.into(), value.into());
        Self::push(properties)
    }

    /// Run `f` with `snapshot` installed as the current context
    pub fn run_with<R>(snapshot: &ContextSnapshot, f: impl FnOnce() -> R) -> R {
        let _guard = LogContextGuard::install(snapshot.frame.clone());
        f()
    }

    /// Run a future with an extra frame on top of the context current at call time
    pub fn scope<F: Future>(properties: Properties, future: F) -> impl Future<Output = F::Output> {
        let frame = Self::current().child(properties);
        TASK_CONTEXT.scope(RefCell::new(frame), future)
    }

    /// Attach the current context to a future that will run elsewhere
    pub fn bind<F: Future>(future: F) -> impl Future<Output = F::Output> {
        let frame = Self::current().frame;
        TASK_CONTEXT.scope(RefCell::new(frame), future)
    }

    /// `tokio::spawn` that inherits the current context
    pub fn spawn<F>(future: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(Self::bind(future))
    }

    /// `std::thread::spawn` that inherits the current context
    pub fn spawn_thread<F, T>(f: F) -> std::thread::JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let snapshot = Self::current();
        std::thread::spawn(move || Self::run_with(&snapshot, f))
    }
}

/// RAII guard returned by [`LogContext::push`]
///
/// Restores the context that was current when the guard was created. Guards are
/// `!Send`: a pushed frame belongs to the flow that pushed it. In async code use
/// [`LogContext::scope`] instead of holding a guard across `.await`.
pub struct LogContextGuard {
    previous: Option<Option<Arc<ContextFrame>>>,
    _not_send: PhantomData<*const ()>,
}

impl LogContextGuard {
    fn install(frame: Option<Arc<ContextFrame>>) -> Self {
        let previous = with_slot(|slot| slot.replace(frame));
        Self {
            previous: Some(previous),
            _not_send: PhantomData,
        }
    }
}

impl Drop for LogContextGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            with_slot(|slot| {
                *slot.borrow_mut() = previous;
            });
        }
    }
}
