mod common;
mod debounce;
mod service;
