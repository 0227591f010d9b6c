/// UI module exports

pub mod popup;
