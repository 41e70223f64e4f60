mod bonus;
mod common;
mod service;
