pub(crate) mod catchers;
pub(crate) mod clothing_management;
pub(crate) mod images;
pub(crate) mod user_management;
