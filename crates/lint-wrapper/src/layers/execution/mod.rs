pub(crate) mod executable;
pub(crate) mod output;
pub(crate) mod result_file;
