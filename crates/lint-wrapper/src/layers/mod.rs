pub(crate) mod arguments;
pub(crate) mod execution;
pub(crate) mod service;
