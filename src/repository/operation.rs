/// Policy selector for repository operations.
///
/// Single-source repositories accept any operation and ignore it. The
/// tiered engine recognizes the four source policies, resolves `Default`
/// per method, and rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    /// Consult the network source only.
    Network,
    /// Consult the storage source only.
    Storage,
    /// Network first, then mirror the confirmed result into storage.
    NetworkSync,
    /// Storage first; reads fall back to a network sync on miss, writes
    /// forward the stored value to the network.
    StorageSync,
    /// No policy at all.
    Blank,
    /// Per-method default: `StorageSync` for reads, `NetworkSync` for
    /// writes and deletes.
    #[default]
    Default,
}
