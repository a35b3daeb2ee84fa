mod common;
mod encoding;
