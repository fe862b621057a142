pub mod client_view;
pub mod client_wizard;
pub mod clients;
pub mod components;
pub mod login;
pub mod register;
