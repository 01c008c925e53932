//! Dynamic loading capability
//!
//! The pipeline never calls a platform loader directly. It is written against
//! [`DynamicLoader`], which each supported platform implements once in
//! [`crate::os`].

use crate::Outcome;
use bitflags::bitflags;
use core::{
    ffi::c_void,
    fmt::{Debug, Display},
    marker::PhantomData,
    ptr::NonNull,
};
use std::{borrow::Cow, path::Path};

pub use crate::os::DefaultLoader;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    /// How a library is opened.
    ///
    /// Backends translate these to their native flags and ignore the ones
    /// they have no equivalent for.
    pub struct OpenFlags: u32 {
        /// Resolve function references on first call rather than at load time.
        const LAZY = 1;

        /// Make the library's symbols available to libraries loaded later.
        const GLOBAL = 2;
    }
}

impl OpenFlags {
    /// Lazy binding with global visibility, used for every library the
    /// trampoline opens.
    pub const TRAMPOLINE: OpenFlags = OpenFlags::LAZY.union(OpenFlags::GLOBAL);
}

/// Why a library is being opened.
///
/// Backends that compose their own failure text use it to tell a dependency
/// apart from the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadRole {
    Dependency,
    Target,
}

/// Failure reported by a platform loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderError {
    /// The loader's own text, unmodified.
    pub msg: Cow<'static, str>,
}

impl LoaderError {
    #[cold]
    #[inline(never)]
    pub fn new(msg: impl Into<Cow<'static, str>>) -> Self {
        Self { msg: msg.into() }
    }
}

impl Display for LoaderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl core::error::Error for LoaderError {}

/// A trait for the platform dynamic linker.
///
/// # Safety
/// Opening a library runs its initialisers and closing it runs its
/// finalisers; both execute arbitrary foreign code in this process.
/// Implementors must return only handles that stay valid until passed to
/// [`DynamicLoader::close`], and addresses that stay valid while the handle
/// they were resolved from is open.
pub trait DynamicLoader {
    /// Platform handle of an opened library.
    type Handle: Debug;

    /// Opens the library at `path`.
    ///
    /// # Safety
    /// Runs the library's initialisers.
    unsafe fn open(
        path: &Path,
        flags: OpenFlags,
        role: LoadRole,
    ) -> Result<Self::Handle, LoaderError>;

    /// Clears any error state left by earlier calls, so that the next
    /// [`DynamicLoader::resolve`] reports only its own failure.
    fn clear_error();

    /// Looks up the address of `name` inside `handle`.
    ///
    /// # Safety
    /// `handle` must be open.
    unsafe fn resolve(handle: &Self::Handle, name: &str) -> Result<NonNull<c_void>, LoaderError>;

    /// Releases `handle`. Failure is reported, never acted on.
    ///
    /// # Safety
    /// Nothing resolved from `handle` may be used afterwards.
    unsafe fn close(handle: Self::Handle) -> Outcome;
}

/// An entry point taking no arguments and returning nothing.
pub type EntryPoint = unsafe extern "C" fn();

/// An entry point resolved from a library handle.
///
/// The borrow on the handle keeps the handle from being released while the
/// symbol is alive.
pub struct Symbol<'lib, H> {
    func: EntryPoint,
    _handle: PhantomData<&'lib H>,
}

impl<'lib, H> Symbol<'lib, H> {
    /// # Safety
    /// `ptr` must be the address of a function with the [`EntryPoint`]
    /// signature, resolved from `_handle`.
    pub unsafe fn from_raw(_handle: &'lib H, ptr: NonNull<c_void>) -> Self {
        Self {
            func: unsafe { core::mem::transmute::<*mut c_void, EntryPoint>(ptr.as_ptr()) },
            _handle: PhantomData,
        }
    }

    /// Calls the entry point on the current thread and waits for it to
    /// return.
    ///
    /// # Safety
    /// Runs foreign code whose behaviour the caller cannot check.
    pub unsafe fn call(&self) {
        unsafe { (self.func)() }
    }
}

impl<H> Debug for Symbol<'_, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Symbol")
            .field("addr", &(self.func as *const ()))
            .finish()
    }
}
