mod common;
mod projection;
mod service;
