use crate::ViewId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("view {0:?} is not part of the tree")]
    UnknownView(ViewId),
    #[error("cannot attach {child:?} under {parent:?}: parent is inside the child's subtree")]
    Cycle { parent: ViewId, child: ViewId },
}
