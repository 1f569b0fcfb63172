mod details;
mod panels;
mod tooltip;

pub(in crate::app) use self::details::paint_details;
pub(in crate::app) use self::tooltip::show_tooltip;
