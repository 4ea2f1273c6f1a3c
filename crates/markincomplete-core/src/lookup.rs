//! Find a file descriptor by its stable index.

use crate::host::FileDescriptor;

/// Returns the descriptor whose `index` field equals `index`.
///
/// Hosts normally keep file `i` at position `i`, so that slot is checked
/// first; a linear scan covers any other ordering.
pub fn find_by_index(files: &[FileDescriptor], index: usize) -> Option<&FileDescriptor> {
    if let Some(f) = files.get(index) {
        if f.index == index {
            return Some(f);
        }
    }
    files.iter().find(|f| f.index == index)
}
