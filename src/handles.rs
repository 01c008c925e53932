use crate::{Outcome, loader::DynamicLoader};
use core::fmt::Debug;

/// Library handles acquired by one invocation, in load order.
///
/// Dropping a `HandleSet` does not close anything: when the pipeline aborts,
/// process exit reclaims the mappings. Handles are only released through
/// [`HandleSet::release`].
#[derive(Debug)]
pub struct HandleSet<H> {
    dependencies: Vec<H>,
    target: Option<H>,
}

impl<H> HandleSet<H> {
    pub const fn new() -> Self {
        Self {
            dependencies: Vec::new(),
            target: None,
        }
    }

    #[inline]
    pub fn push_dependency(&mut self, handle: H) {
        self.dependencies.push(handle);
    }

    /// Stores the target handle and returns a reference to it for symbol
    /// resolution.
    #[inline]
    pub fn set_target(&mut self, handle: H) -> &H {
        self.target.insert(handle)
    }

    #[inline]
    pub fn target(&self) -> Option<&H> {
        self.target.as_ref()
    }

    /// Number of handles held.
    #[inline]
    pub fn len(&self) -> usize {
        self.dependencies.len() + usize::from(self.target.is_some())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closes the target first, then every dependency in load order.
    ///
    /// # Safety
    /// No symbol resolved from these handles may be used afterwards.
    pub unsafe fn release<L>(self) -> Vec<Outcome>
    where
        L: DynamicLoader<Handle = H>,
        H: Debug,
    {
        let mut outcomes = Vec::with_capacity(self.len());
        for handle in self.target.into_iter().chain(self.dependencies) {
            #[cfg(feature = "log")]
            log::trace!("release {:?}", handle);
            outcomes.push(unsafe { L::close(handle) });
        }
        outcomes
    }
}

impl<H> Default for HandleSet<H> {
    fn default() -> Self {
        Self::new()
    }
}
