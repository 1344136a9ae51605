mod common;
mod deps_tests;
mod status_tests;
