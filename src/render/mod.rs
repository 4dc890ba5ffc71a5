pub(crate) mod instance;
pub(crate) mod session;
pub(crate) mod snapshot;
