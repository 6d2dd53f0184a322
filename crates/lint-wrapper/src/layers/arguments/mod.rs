pub(crate) mod params;
pub(crate) mod sanitize;
