mod block;
mod chain;
mod common;
