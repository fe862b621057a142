mod client;
mod user;

pub use client::{Client, ClientPage, RemoteAccess, MAX_REMOTE_ACCESS};
pub use user::{Credentials, LoginResponse, NewUser, User};
