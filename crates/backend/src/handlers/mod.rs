pub mod a001_form;
pub mod a002_response;
