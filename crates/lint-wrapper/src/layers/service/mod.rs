pub(crate) mod handler;
pub(crate) mod logging;
pub(crate) mod oneshot;
pub(crate) mod worker;

#[cfg(test)]
pub(crate) mod fake;

pub(crate) use handler::RequestHandler;
pub(crate) use oneshot::run_once;
pub(crate) use worker::run_worker;
