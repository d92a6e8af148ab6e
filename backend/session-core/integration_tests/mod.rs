mod error;
mod launch;
mod session;
