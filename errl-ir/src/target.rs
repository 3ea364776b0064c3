/// Opaque reference to a target owned by a [`TargetProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle(pub usize);

/// Read-only view of the hardware target tree.
///
/// Every lookup may come back empty; a miss is not an error for the caller.
pub trait TargetProvider: Sync {
    fn root(&self) -> TargetHandle;

    /// Search `root` and its descendants for the target whose physical binary
    /// path equals `path`.
    fn find_by_physical_path(&self, root: TargetHandle, path: &[u8]) -> Option<TargetHandle>;

    fn location_code(&self, target: TargetHandle) -> Option<String>;

    fn physical_device_path(&self, target: TargetHandle) -> Option<String>;

    fn mru_id(&self, target: TargetHandle) -> Option<u32>;
}

/// Provider for systems without a target tree: every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTargets;

impl TargetProvider for EmptyTargets {
    fn root(&self) -> TargetHandle {
        TargetHandle(0)
    }

    fn find_by_physical_path(&self, _root: TargetHandle, _path: &[u8]) -> Option<TargetHandle> {
        None
    }

    fn location_code(&self, _target: TargetHandle) -> Option<String> {
        None
    }

    fn physical_device_path(&self, _target: TargetHandle) -> Option<String> {
        None
    }

    fn mru_id(&self, _target: TargetHandle) -> Option<u32> {
        None
    }
}
