//! Handles shared by the deferred attach and the animation loop.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Liveness of one attach cycle.
///
/// Cloned into the deferred attach and the frame loop, and cancelled when the
/// component cleans up, so a timer or frame that fires afterwards does nothing.
#[derive(Clone, Debug)]
pub struct AttachGuard(Arc<AtomicBool>);

impl Default for AttachGuard {
	fn default() -> Self {
		Self(Arc::new(AtomicBool::new(true)))
	}
}

impl AttachGuard {
	pub fn is_live(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}

	pub fn cancel(&self) {
		self.0.store(false, Ordering::Relaxed);
	}

	/// Whether both handles belong to the same attach cycle.
	pub fn same_cycle(&self, other: &AttachGuard) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	/// Run `attach` unless the cycle was cancelled.
	pub fn run<T>(&self, attach: impl FnOnce() -> T) -> Option<T> {
		self.is_live().then(attach)
	}
}

/// Slot for a callback that reschedules itself.
///
/// The callback holds a clone of its own slot, so neither is freed until the
/// slot is released.
pub struct FrameSlot<C>(Rc<RefCell<Option<C>>>);

impl<C> Clone for FrameSlot<C> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<C> Default for FrameSlot<C> {
	fn default() -> Self {
		Self(Rc::new(RefCell::new(None)))
	}
}

impl<C> FrameSlot<C> {
	pub fn set(&self, callback: C) {
		*self.0.borrow_mut() = Some(callback);
	}

	pub fn with<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
		self.0.borrow().as_ref().map(f)
	}

	/// Drop the stored callback.
	pub fn release(&self) {
		let released = self.0.borrow_mut().take();
		drop(released);
	}
}
