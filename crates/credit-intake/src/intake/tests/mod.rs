mod common;
mod records;
mod session;
