// CV record editing: contact, summary and the six item sections.

pub mod dedup;
pub mod form;
pub mod handlers;
pub mod items;
