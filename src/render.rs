pub(crate) mod blend;
pub(crate) mod buffer;
pub(crate) mod compositor;
pub(crate) mod presenter;
