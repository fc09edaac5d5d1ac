pub(crate) mod bottom_bar;
pub(crate) mod form;
pub(crate) mod inspect;
pub(crate) mod logs;
