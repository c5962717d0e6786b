mod links;
mod tree_ops;
mod write_read;

use crate::memory::MemoryEngine;
use crate::fs::Vfs;

pub(crate) fn new_fs() -> Vfs {
    Vfs::new(MemoryEngine::new())
}
