// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped acquisition of ambient move/end listeners.
//!
//! While a drag is in flight the host has to deliver move and end events even when the
//! pointer leaves the slider, which usually means installing listeners on some global
//! surface (a window, a document, a compositor seat). The engine asks for these through
//! [`InputSurface`] and tracks them with a [`ListenerGuard`]:
//!
//! - [`ListenerGuard::acquire`] attaches exactly once.
//! - [`ListenerGuard::release`] detaches exactly once; releasing again is a no-op.
//!
//! Every drag exit path (end, multi-touch abort, error abort, forced cancel, drop)
//! goes through `release`, so attaches and detaches always pair up.

/// Which family of input a drag session listens to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Mouse-style pointer: move and up listeners.
    Pointer,
    /// Touch contacts: touch-move and touch-end listeners.
    Touch,
}

/// A host surface that can install and remove move/end listeners.
///
/// Hosts that already route all input to the slider (for example an immediate-mode
/// loop) can use `()`, which does nothing.
pub trait InputSurface {
    /// Starts delivering move and end events of `kind` to the slider.
    fn attach(&mut self, kind: InputKind);

    /// Stops delivering move and end events of `kind`.
    fn detach(&mut self, kind: InputKind);
}

impl InputSurface for () {
    fn attach(&mut self, _kind: InputKind) {}

    fn detach(&mut self, _kind: InputKind) {}
}

impl<S: InputSurface + ?Sized> InputSurface for &mut S {
    fn attach(&mut self, kind: InputKind) {
        (**self).attach(kind);
    }

    fn detach(&mut self, kind: InputKind) {
        (**self).detach(kind);
    }
}

/// Tracks one acquisition of listeners on an [`InputSurface`].
///
/// The guard does not borrow the surface, so the owner of both is responsible for
/// calling [`release`](Self::release) before the guard is forgotten.
#[derive(Debug, PartialEq, Eq)]
pub struct ListenerGuard {
    kind: Option<InputKind>,
}

impl ListenerGuard {
    /// Attaches listeners of `kind` to `surface` and returns the guard owning them.
    pub fn acquire<S: InputSurface + ?Sized>(surface: &mut S, kind: InputKind) -> Self {
        surface.attach(kind);
        Self { kind: Some(kind) }
    }

    /// Detaches the listeners if they are still attached.
    ///
    /// Returns `true` if this call performed the detach.
    pub fn release<S: InputSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        match self.kind.take() {
            Some(kind) => {
                surface.detach(kind);
                true
            }
            None => false,
        }
    }

    /// Whether the listeners are still attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.kind.is_some()
    }

    /// The kind of listeners held, if still attached.
    #[must_use]
    pub const fn kind(&self) -> Option<InputKind> {
        self.kind
    }
}
