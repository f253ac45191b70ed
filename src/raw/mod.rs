mod arena;
mod graph;
mod handle;
mod node;
mod raw_bst_map;
mod shaping;

pub(crate) use handle::Handle;
pub(crate) use raw_bst_map::RawBstMap;
