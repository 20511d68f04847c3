pub mod a001_form;
pub mod a002_response;
pub mod a003_template;
pub mod common;
