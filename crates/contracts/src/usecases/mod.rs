pub mod u101_submit_response;
