pub(crate) mod model;
pub(crate) mod response;
pub(crate) mod validate;
