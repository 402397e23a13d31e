//! Cross-target interior mutability.
//!
//! The demo only ever runs one cooperative task at a time in the browser,
//! but native tests drive the same types from a tokio runtime. The cell
//! below picks the cheapest primitive that is sound on each target.

/// Platform-appropriate shared interior mutability cell.
///
/// - Native: `std::sync::RwLock` (multi-threaded read-write lock)
/// - WASM: `std::cell::RefCell` (single-threaded borrow checking)
///
/// Guards must never be held across an `.await`.
///
/// # Example
/// ```
/// use passkey_common::SharedCell;
///
/// let cell = SharedCell::new(Option::<u32>::None);
///
/// *cell.write() = Some(7);
/// assert_eq!(*cell.read(), Some(7));
///
/// assert_eq!(cell.replace(None), Some(7));
/// assert!(cell.read().is_none());
/// ```
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
#[derive(Debug, Default)]
pub struct SharedCell<T>(std::sync::RwLock<T>);

#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
impl<T> SharedCell<T> {
    /// Creates a new SharedCell with the given value
    pub fn new(value: T) -> Self {
        Self(std::sync::RwLock::new(value))
    }

    /// Acquires a read lock, blocking until it can be acquired
    pub fn read(&self) -> std::sync::RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Acquires a write lock, blocking until it can be acquired
    pub fn write(&self) -> std::sync::RwLockWriteGuard<'_, T> {
        self.0
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
#[derive(Debug, Default)]
pub struct SharedCell<T>(std::cell::RefCell<T>);

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
impl<T> SharedCell<T> {
    /// Creates a new SharedCell with the given value
    pub fn new(value: T) -> Self {
        Self(std::cell::RefCell::new(value))
    }

    /// Borrows the value immutably
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed
    pub fn read(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrows the value mutably
    ///
    /// # Panics
    /// Panics if the value is currently borrowed
    pub fn write(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> SharedCell<T> {
    /// Swap in `value`, returning what was held before.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.write(), value)
    }
}

impl<T: Clone> SharedCell<T> {
    /// Clone the held value out of the cell.
    pub fn get(&self) -> T {
        self.read().clone()
    }
}
