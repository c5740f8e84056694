mod common;

mod cli_stubs;
