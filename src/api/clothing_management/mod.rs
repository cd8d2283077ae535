pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod form;
pub(crate) mod get_clothing;
pub(crate) mod list;
pub(crate) mod models;
pub(crate) mod service;
pub(crate) mod store;
pub(crate) mod test_support;
pub(crate) mod update;
pub(crate) mod validation;
