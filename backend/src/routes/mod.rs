pub(crate) mod advice;
pub(crate) mod health;
pub(crate) mod predict;
