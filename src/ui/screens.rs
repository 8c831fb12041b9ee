pub(crate) mod map;
pub(crate) mod not_found;
pub(crate) mod overview;
pub(crate) mod projects;
pub(crate) mod reports;
