mod common;
mod form;
